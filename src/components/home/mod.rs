mod reducer;

use crate::environment::Environment;
use crate::store::{Effect, Reducer, Store};

pub use reducer::{HomeAction, HomeState, FAB_MESSAGE};

pub type HomeStore = Store<HomeReducer>;

pub struct HomeReducer;

impl Reducer for HomeReducer {
    type Action = HomeAction;

    type State = HomeState;

    type Environment = Environment;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reducer::reduce(action, state, environment)
    }

    fn initial_action() -> Option<Self::Action> {
        Some(HomeAction::Initial)
    }
}
