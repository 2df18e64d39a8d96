use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

/// A shared, observable value.
///
/// Every clone writes to the same value. Observers either read the latest
/// value, `subscribe` to change notifications, or consume it as a stream.
/// Once the last `Publisher` is dropped, subscribers see the channel close.
pub struct Publisher<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Default> Default for Publisher<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Publisher")
            .field(&*self.sender.borrow())
            .finish()
    }
}

impl<T> Publisher<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Publisher<T> {
    pub fn value(&self) -> T {
        self.sender.borrow().clone()
    }
}

impl<T: PartialEq> Publisher<T> {
    /// Replace the value, notifying observers only on an actual change
    pub fn set(&self, value: T) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Publisher<T> {
    /// A lazy stream that yields the current value first and then every
    /// subsequent change. It ends when all publishers are gone.
    pub fn stream(&self) -> BoxStream<'static, T> {
        let receiver = self.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let value = receiver.borrow_and_update().clone();
            Some((value, (receiver, false)))
        })
        .boxed()
    }
}
