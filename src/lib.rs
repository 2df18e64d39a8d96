mod app;
pub mod components;
pub mod environment;
mod helper;
pub mod store;

pub use app::{launch, run, App};
pub use environment::Environment;

/// Handy macro for future localization
#[macro_export]
macro_rules! loc {
    ($x:expr $(,)?) => {
        $x
    };
}
