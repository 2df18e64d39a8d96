mod effect;
mod publisher;

pub use effect::{BoxFuture, Effect};
pub use publisher::Publisher;

use std::collections::VecDeque;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

/// A screen or controller: a closed set of actions reduced over one state.
///
/// `reduce` is synchronous and is the only place the state changes. Work that
/// has to wait is returned as an [`Effect`].
pub trait Reducer: 'static {
    type Action: std::fmt::Debug + Send + 'static;

    type State: Clone + PartialEq + Send + Sync + 'static;

    type Environment: Clone + Send + Sync + 'static;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action>;

    fn initial_action() -> Option<Self::Action> {
        None
    }
}

/// Runs a [`Reducer`] as a single writer.
///
/// Actions are reduced one at a time, in the order they were sent. Every
/// reduction is published to the observers. Dropping the store aborts the
/// actor together with all of its running effects, so no state is published
/// afterwards.
pub struct Store<R: Reducer> {
    dispatcher: Dispatcher<R::Action>,
    state: watch::Receiver<R::State>,
    handle: JoinHandle<()>,
}

impl<R: Reducer> Store<R> {
    /// Must be called from within a tokio runtime
    pub fn spawn(state: R::State, environment: R::Environment) -> Self {
        let (sender, receiver) = flume::unbounded();
        let publisher = Publisher::new(state);
        let observed = publisher.subscribe();
        if let Some(action) = R::initial_action() {
            // the receiver is alive, it was created right above
            let _ = sender.send(action);
        }
        let handle = tokio::spawn(run::<R>(receiver, publisher, environment));
        Self {
            dispatcher: Dispatcher { sender },
            state: observed,
            handle,
        }
    }

    pub fn send(&self, action: R::Action) {
        self.dispatcher.send(action)
    }

    /// A sender for tasks that outlive a borrow of the store. It does not
    /// keep the store running.
    pub fn dispatcher(&self) -> Dispatcher<R::Action> {
        self.dispatcher.clone()
    }

    pub fn state(&self) -> R::State {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.state.clone()
    }

    /// Resolves with the first published state that matches `predicate`.
    /// `None` if the store went away before that happened.
    pub async fn wait_for(&self, predicate: impl FnMut(&R::State) -> bool) -> Option<R::State> {
        let mut receiver = self.state.clone();
        let state = receiver.wait_for(predicate).await.ok()?;
        Some(state.clone())
    }
}

pub struct Dispatcher<A> {
    sender: flume::Sender<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: std::fmt::Debug> Dispatcher<A> {
    pub fn send(&self, action: A) {
        if let Err(e) = self.sender.send(action) {
            log::warn!("Store is gone, dropping {:?}", e.into_inner());
        }
    }
}

impl<R: Reducer> Drop for Store<R> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<R: Reducer>(
    receiver: flume::Receiver<R::Action>,
    publisher: Publisher<R::State>,
    environment: R::Environment,
) {
    let mut state = publisher.value();
    let mut effects: JoinSet<Option<R::Action>> = JoinSet::new();
    loop {
        let action = tokio::select! {
            biased;
            received = receiver.recv_async() => match received {
                Ok(action) => action,
                // all senders are gone
                Err(_) => break,
            },
            Some(joined) = effects.join_next(), if !effects.is_empty() => match joined {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(e) => {
                    if e.is_panic() {
                        log::error!("Effect panicked: {e:?}");
                    }
                    continue;
                }
            },
        };
        apply::<R>(action, &mut state, &environment, &mut effects);
        publisher.set(state.clone());
    }
    log::trace!("Store finished");
}

fn apply<R: Reducer>(
    action: R::Action,
    state: &mut R::State,
    environment: &R::Environment,
    effects: &mut JoinSet<Option<R::Action>>,
) {
    let mut pending = VecDeque::from([action]);
    while let Some(action) = pending.pop_front() {
        let effect = R::reduce(action, state, environment);
        schedule(effect, &mut pending, effects);
    }
}

fn schedule<A: Send + 'static>(
    effect: Effect<A>,
    pending: &mut VecDeque<A>,
    effects: &mut JoinSet<Option<A>>,
) {
    match effect {
        Effect::Nothing => {}
        Effect::Action(action) => pending.push_back(action),
        Effect::Future(future) => {
            effects.spawn(future);
        }
        Effect::Multiple(all) => {
            for effect in all {
                schedule(effect, pending, effects);
            }
        }
    }
}
