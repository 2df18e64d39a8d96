use std::pin::Pin;

use futures_util::{Future, FutureExt};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a reducer wants to happen after it changed the state.
///
/// Futures run on the store's task set. Their output is reduced as the next
/// action. Nothing here outlives the store that runs it.
pub enum Effect<A> {
    Nothing,
    Action(A),
    Future(BoxFuture<Option<A>>),
    Multiple(Vec<Effect<A>>),
}

impl<A: Send + 'static> Effect<A> {
    pub const NONE: Self = Effect::Nothing;

    pub fn action(action: A) -> Self {
        Effect::Action(action)
    }

    /// Run `future` and reduce its mapped output
    pub fn future<T, F>(future: F, mapper: impl FnOnce(T) -> A + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Effect::Future(future.map(|output| Some(mapper(output))).boxed())
    }

    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        Effect::Multiple(effects.into_iter().collect())
    }

    pub fn is_none(&self) -> bool {
        match self {
            Effect::Nothing => true,
            Effect::Multiple(effects) => effects.iter().all(Effect::is_none),
            Effect::Action(_) | Effect::Future(_) => false,
        }
    }
}

impl<A> std::fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nothing => write!(f, "Nothing"),
            Self::Action(_) => write!(f, "Action"),
            Self::Future(_) => write!(f, "Future"),
            Self::Multiple(effects) => f.debug_tuple("Multiple").field(effects).finish(),
        }
    }
}
