mod reducer;

use crate::environment::Environment;
use crate::store::{Effect, Reducer, Store};

pub use reducer::{AuthAction, AuthState};

pub type AuthStore = Store<AuthReducer>;

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type Action = AuthAction;

    type State = AuthState;

    type Environment = Environment;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reducer::reduce(action, state, environment)
    }
}
