use futures_util::StreamExt;

use crate::environment::types::ThemePreferences;
use crate::environment::{Environment, SessionRepository};

/// What a successful startup run found out
#[derive(Clone, Debug, PartialEq)]
pub struct StartupOutcome {
    pub is_authenticated: bool,
    pub user_name: Option<String>,
    pub theme_preferences: ThemePreferences,
}

/// The startup sequence. Only the session check is allowed to fail
/// silently; any other failure ends the run.
pub async fn run(environment: &Environment) -> Result<StartupOutcome, String> {
    // keep the splash visible for a moment, even if everything else is fast
    tokio::time::sleep(environment.startup.splash_minimum()).await;

    let session = environment.session.as_ref();
    let is_authenticated = check_authentication(session).await;
    let user_name = if is_authenticated {
        Some(current_user_name(session).await?)
    } else {
        None
    };

    let theme_preferences = load_configuration(environment).await?;
    sync_offline_data(environment).await?;

    Ok(StartupOutcome {
        is_authenticated,
        user_name,
        theme_preferences,
    })
}

async fn check_authentication(session: &dyn SessionRepository) -> bool {
    match session.is_logged_in().next().await {
        Some(Ok(is_logged_in)) => is_logged_in,
        Some(Err(e)) => {
            log::warn!("Session check failed, continuing signed out: {e}");
            false
        }
        None => {
            log::warn!("Session check finished without an answer");
            false
        }
    }
}

async fn current_user_name(session: &dyn SessionRepository) -> Result<String, String> {
    match session.current_user().next().await {
        Some(result) => result.map(|user| user.name),
        None => Err("The session ended before the user was loaded".to_string()),
    }
}

async fn load_configuration(environment: &Environment) -> Result<ThemePreferences, String> {
    tokio::time::sleep(environment.startup.configuration()).await;
    environment.repository.theme_preferences().await
}

async fn sync_offline_data(environment: &Environment) -> Result<(), String> {
    tokio::time::sleep(environment.startup.sync()).await;
    let synced = environment.repository.sync_offline_data().await?;
    if synced > 0 {
        log::info!("Synced {synced} offline changes");
    }
    Ok(())
}
