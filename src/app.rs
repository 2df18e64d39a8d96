use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::components::auth::{AuthState, AuthStore};
use crate::components::home::{HomeState, HomeStore};
use crate::components::startup::{SplashGate, StartupAction, StartupState, StartupStore};
use crate::environment::types::Route;
use crate::environment::{Environment, Repository, TabNavigator};
use crate::store::Dispatcher;

pub fn run() {
    use env_logger::Env;
    use std::io::Write;
    env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not start the runtime: {e:?}");
            return;
        }
    };

    if let Err(e) = runtime.block_on(launch()) {
        log::error!("{e}");
    }
}

/// Starts the app on the stored data and shows the start screen once the
/// splash may go away
pub async fn launch() -> Result<(), String> {
    let repository = Repository::new()?;
    log::debug!("Data in {}", repository.directory().display());
    let app = App::build(repository);

    let mut splash = app.splash_gate();
    log::trace!("keep splash: {}", splash.keep_on_screen());
    let released = splash.wait().await;

    // the splash may have been dismissed before the startup run finished
    let state = app
        .startup
        .wait_for(|state| !state.is_starting)
        .await
        .unwrap_or(released);

    if let Some(ref error) = state.error_message {
        log::error!("Startup failed: {error}");
    }
    log::debug!(
        "route {:?}, palette {}",
        state.route(),
        state.theme_preferences.palette()
    );
    println!("{}", state.greeting());
    Ok(())
}

/// The object graph: one environment shared by every screen store
pub struct App {
    pub environment: Environment,
    pub navigator: TabNavigator,
    pub startup: StartupStore,
    pub home: HomeStore,
    pub auth: AuthStore,
    sign_in: JoinHandle<()>,
}

impl App {
    pub fn build(repository: Repository) -> Self {
        let navigator = TabNavigator::default();
        let environment = Environment::new(repository, Arc::new(navigator.clone()));
        Self::new(environment, navigator)
    }

    /// Spawns the stores, which starts the startup run.
    /// Must be called from within a tokio runtime.
    pub fn new(environment: Environment, navigator: TabNavigator) -> Self {
        let startup = StartupStore::spawn(StartupState::default(), environment.clone());
        let home = HomeStore::spawn(HomeState::default(), environment.clone());
        let auth = AuthStore::spawn(AuthState::default(), environment.clone());
        let sign_in = tokio::spawn(restart_on_sign_in(auth.subscribe(), startup.dispatcher()));
        Self {
            environment,
            navigator,
            startup,
            home,
            auth,
            sign_in,
        }
    }

    pub fn splash_gate(&self) -> SplashGate {
        SplashGate::new(self.startup.subscribe())
    }

    pub fn route(&self) -> Route {
        self.startup.state().route()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.sign_in.abort();
    }
}

/// Every sign-in on the auth screen reruns startup, which moves the route
/// to Home
async fn restart_on_sign_in(mut auth: watch::Receiver<AuthState>, startup: Dispatcher<StartupAction>) {
    loop {
        let signed_in = auth.wait_for(|state| state.is_logged_in).await.is_ok();
        if !signed_in {
            break;
        }
        log::debug!("Signed in, restarting startup");
        startup.send(StartupAction::RetryInitialization);
        let signed_out = auth.wait_for(|state| !state.is_logged_in).await.is_ok();
        if !signed_out {
            break;
        }
    }
}
