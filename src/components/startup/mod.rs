mod pipeline;
mod reducer;
mod splash;

use crate::environment::Environment;
use crate::store::{Effect, Reducer, Store};

pub use pipeline::StartupOutcome;
pub use reducer::{StartupAction, StartupPhase, StartupState};
pub use splash::SplashGate;

pub type StartupStore = Store<StartupReducer>;

/// Runs the startup sequence once the store is spawned
pub struct StartupReducer;

impl Reducer for StartupReducer {
    type Action = StartupAction;

    type State = StartupState;

    type Environment = Environment;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reducer::reduce(action, state, environment)
    }

    fn initial_action() -> Option<Self::Action> {
        Some(StartupAction::InitializeApp)
    }
}
