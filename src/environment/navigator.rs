use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::types::HomeTab;
use crate::store::Publisher;

pub trait HomeNavigator: Send + Sync {
    /// Fire and forget
    fn switch_tab(&self, tab: HomeTab);
}

/// Keeps the visible home tab and the tabs visited before it
#[derive(Clone, Default)]
pub struct TabNavigator {
    current: Publisher<HomeTab>,
    back_stack: Arc<Mutex<Vec<HomeTab>>>,
}

impl TabNavigator {
    pub fn current(&self) -> HomeTab {
        self.current.value()
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeTab> {
        self.current.subscribe()
    }

    /// Go back to the previously visited tab, if there is one
    pub fn back(&self) -> Option<HomeTab> {
        let previous = match self.back_stack.lock() {
            Ok(mut stack) => stack.pop()?,
            Err(e) => {
                log::error!("Navigation Data Error: {e:?}");
                return None;
            }
        };
        self.current.set(previous);
        Some(previous)
    }

    pub fn history(&self) -> Vec<HomeTab> {
        self.back_stack
            .lock()
            .map(|stack| stack.clone())
            .unwrap_or_default()
    }
}

impl HomeNavigator for TabNavigator {
    fn switch_tab(&self, tab: HomeTab) {
        let previous = self.current.value();
        if previous == tab {
            return;
        }
        match self.back_stack.lock() {
            Ok(mut stack) => {
                // a tab appears only once, the latest visit wins
                stack.retain(|t| *t != previous);
                stack.push(previous);
            }
            Err(e) => log::error!("Navigation Data Error: {e:?}"),
        }
        self.current.set(tab);
    }
}

impl std::fmt::Debug for TabNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabNavigator")
            .field("current", &self.current())
            .finish()
    }
}
