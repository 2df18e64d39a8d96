use tokio::sync::watch;

use super::StartupState;

/// Decides whether the splash overlay stays on screen
#[derive(Clone)]
pub struct SplashGate {
    state: watch::Receiver<StartupState>,
}

impl SplashGate {
    pub fn new(state: watch::Receiver<StartupState>) -> Self {
        Self { state }
    }

    pub fn keep_on_screen(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Resolves with the first state that lets the splash go.
    /// If the startup store is gone, the last known state is returned.
    pub async fn wait(&mut self) -> StartupState {
        let released = self
            .state
            .wait_for(|state| !state.is_loading)
            .await
            .map(|state| state.clone());
        match released {
            Ok(state) => state,
            Err(_) => self.state.borrow().clone(),
        }
    }
}
