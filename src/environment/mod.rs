pub mod navigator;
pub mod repository;
pub mod session;
pub mod types;

use std::sync::Arc;

pub use navigator::{HomeNavigator, TabNavigator};
pub use repository::Repository;
pub use session::SessionRepository;

use types::StartupConfig;

/// Everything the reducers talk to. Built once when the app starts and
/// handed to every store.
#[derive(Clone)]
pub struct Environment {
    pub session: Arc<dyn SessionRepository>,
    pub navigator: Arc<dyn HomeNavigator>,
    pub repository: Repository,
    pub startup: StartupConfig,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    /// The repository doubles as the session store
    pub fn new(repository: Repository, navigator: Arc<dyn HomeNavigator>) -> Self {
        Self {
            session: Arc::new(repository.clone()),
            navigator,
            startup: repository.startup_config(),
            repository,
        }
    }

    pub fn with_session(mut self, session: Arc<dyn SessionRepository>) -> Self {
        self.session = session;
        self
    }

    pub fn with_startup_config(mut self, startup: StartupConfig) -> Self {
        self.startup = startup;
        self
    }
}
