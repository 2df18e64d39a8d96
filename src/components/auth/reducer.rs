use crate::environment::types::User;
use crate::environment::Environment;
use crate::loc;
use crate::store::Effect;

#[derive(Clone, Debug)]
pub enum AuthAction {
    EmailChanged(String),
    PasswordChanged(String),
    TogglePasswordVisibility,
    Submit,
    LoginFinished(Result<User, String>),
    ErrorDismissed,
}

#[derive(Default, Clone, Debug, Eq, PartialEq)]
pub struct AuthState {
    pub email: String,
    pub password: String,
    pub is_password_visible: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_logged_in: bool,
}

impl AuthState {
    pub fn can_submit(&self) -> bool {
        !self.is_loading && validate(&self.email, &self.password).is_ok()
    }
}

fn validate(email: &str, password: &str) -> Result<(), &'static str> {
    let email = email.trim();
    let Some((name, host)) = email.split_once('@') else {
        return Err(loc!("Please enter a valid email address"));
    };
    if name.is_empty() || host.is_empty() {
        return Err(loc!("Please enter a valid email address"));
    }
    if password.is_empty() {
        return Err(loc!("Please enter your password"));
    }
    Ok(())
}

pub fn reduce(action: AuthAction, state: &mut AuthState, environment: &Environment) -> Effect<AuthAction> {
    // don't log the password
    match &action {
        AuthAction::PasswordChanged(_) => log::trace!("PasswordChanged"),
        _ => log::trace!("{action:?}"),
    }
    match action {
        AuthAction::EmailChanged(email) => {
            state.email = email;
        }
        AuthAction::PasswordChanged(password) => {
            state.password = password;
        }
        AuthAction::TogglePasswordVisibility => {
            state.is_password_visible = !state.is_password_visible;
        }
        AuthAction::Submit => {
            if state.is_loading {
                return Effect::NONE;
            }
            if let Err(message) = validate(&state.email, &state.password) {
                state.error_message = Some(message.to_string());
                return Effect::NONE;
            }
            state.is_loading = true;
            let session = environment.session.clone();
            let user = User::new(&state.email);
            return Effect::future(
                async move { session.login(user.clone()).await.map(|_| user) },
                AuthAction::LoginFinished,
            );
        }
        AuthAction::LoginFinished(result) => {
            state.is_loading = false;
            match result {
                Ok(user) => {
                    log::debug!("Signed in as {}", user.id);
                    state.is_logged_in = true;
                    state.password.clear();
                }
                Err(e) => {
                    log::error!("Login failed: {e}");
                    state.error_message = Some(format!("{} {e}", loc!("Could not sign in:")));
                }
            }
        }
        AuthAction::ErrorDismissed => {
            state.error_message = None;
        }
    }
    Effect::NONE
}
