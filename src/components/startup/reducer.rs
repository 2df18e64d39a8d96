use super::pipeline::{self, StartupOutcome};
use crate::environment::types::{Route, ThemePreferences};
use crate::environment::Environment;
use crate::helper::non_empty;
use crate::loc;
use crate::store::Effect;

const STARTUP_FAILED: &str = "Failed to initialize the application";

#[derive(Debug, Clone)]
pub enum StartupAction {
    InitializeApp,
    RetryInitialization,
    /// Dismiss the splash without waiting for the startup run
    SplashComplete,
    Logout,
    ClearError,

    StartupFinished(u64, Result<StartupOutcome, String>),
    LogoutFinished(Result<(), String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StartupState {
    /// Keeps the splash on screen
    pub is_loading: bool,
    /// The last startup run completed
    pub is_initialized: bool,
    pub is_authenticated: bool,
    /// Only set while authenticated
    pub user_name: Option<String>,
    pub error_message: Option<String>,
    pub theme_preferences: ThemePreferences,
    /// A startup run is in flight
    pub is_starting: bool,
    /// Counts startup runs. Only the result of the latest one is applied.
    pub startup_generation: u64,
    /// A logout succeeded while the current run was in flight, so the
    /// session the run checked is gone
    pub signed_out_during_start: bool,
}

impl Default for StartupState {
    fn default() -> Self {
        Self {
            is_loading: true,
            is_initialized: false,
            is_authenticated: false,
            user_name: None,
            error_message: None,
            theme_preferences: ThemePreferences::default(),
            is_starting: false,
            startup_generation: 0,
            signed_out_during_start: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartupPhase {
    Idle,
    Loading,
    Ready { authenticated: bool },
    Failed,
}

impl StartupState {
    pub fn phase(&self) -> StartupPhase {
        if self.is_starting {
            StartupPhase::Loading
        } else if self.is_initialized {
            StartupPhase::Ready {
                authenticated: self.is_authenticated,
            }
        } else if self.startup_generation == 0 {
            StartupPhase::Idle
        } else {
            StartupPhase::Failed
        }
    }

    pub fn route(&self) -> Route {
        Route::for_session(self.is_authenticated)
    }

    /// What the start screen greets with
    pub fn greeting(&self) -> String {
        if self.is_authenticated {
            let name = self.user_name.as_deref().unwrap_or(loc!("User"));
            format!("{} {name}", loc!("Welcome,"))
        } else {
            loc!("Start screen").to_string()
        }
    }
}

pub fn reduce(
    action: StartupAction,
    state: &mut StartupState,
    environment: &Environment,
) -> Effect<StartupAction> {
    log::trace!("{action:?}");
    match action {
        StartupAction::InitializeApp | StartupAction::RetryInitialization => {
            if state.is_starting {
                log::debug!("Startup run {} superseded", state.startup_generation);
            }
            state.is_loading = true;
            state.is_initialized = false;
            state.is_starting = true;
            state.error_message = None;
            state.startup_generation += 1;
            state.signed_out_during_start = false;

            let generation = state.startup_generation;
            let environment = environment.clone();
            Effect::future(
                async move { pipeline::run(&environment).await },
                move |result| StartupAction::StartupFinished(generation, result),
            )
        }
        StartupAction::StartupFinished(generation, result) => {
            if !state.is_starting || generation != state.startup_generation {
                log::debug!("Ignoring outdated startup run {generation}");
                return Effect::NONE;
            }
            state.is_loading = false;
            state.is_starting = false;
            let signed_out = std::mem::take(&mut state.signed_out_during_start);
            match result {
                Ok(outcome) => {
                    if signed_out && outcome.is_authenticated {
                        log::debug!("Startup run {generation} saw a session that was signed out since");
                    }
                    let authenticated = outcome.is_authenticated && !signed_out;
                    state.is_initialized = true;
                    state.is_authenticated = authenticated;
                    state.user_name = outcome.user_name.filter(|_| authenticated);
                    state.theme_preferences = outcome.theme_preferences;
                    state.error_message = None;
                }
                Err(e) => {
                    log::error!("Startup failed: {e}");
                    state.is_initialized = false;
                    state.error_message = Some(non_empty(&e, loc!(STARTUP_FAILED)));
                }
            }
            Effect::NONE
        }
        StartupAction::SplashComplete => {
            state.is_loading = false;
            Effect::NONE
        }
        StartupAction::Logout => {
            let session = environment.session.clone();
            Effect::future(
                async move { session.logout().await },
                StartupAction::LogoutFinished,
            )
        }
        StartupAction::LogoutFinished(result) => {
            match result {
                Ok(_) => {
                    state.is_authenticated = false;
                    state.user_name = None;
                    if state.is_starting {
                        state.signed_out_during_start = true;
                    }
                }
                Err(e) => {
                    log::error!("Logout failed: {e}");
                    state.error_message = Some(format!("{} {e}", loc!("Error signing out:")));
                }
            }
            Effect::NONE
        }
        StartupAction::ClearError => {
            state.error_message = None;
            Effect::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Repository, TabNavigator};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn environment() -> (tempfile::TempDir, Environment) {
        let dir = tempfile::tempdir().expect("tempdir");
        let repository = Repository::with_directory(dir.path()).expect("repository");
        let environment = Environment::new(repository, Arc::new(TabNavigator::default()));
        (dir, environment)
    }

    fn outcome(is_authenticated: bool, user_name: Option<&str>) -> StartupOutcome {
        StartupOutcome {
            is_authenticated,
            user_name: user_name.map(str::to_string),
            theme_preferences: ThemePreferences::default(),
        }
    }

    fn check_invariants(state: &StartupState) {
        assert!(!(state.is_loading && state.is_initialized), "{state:?}");
        if !state.is_authenticated {
            assert_eq!(state.user_name, None, "{state:?}");
        }
    }

    #[test]
    fn starts_idle_behind_the_splash() {
        let state = StartupState::default();
        assert!(state.is_loading);
        assert_eq!(state.phase(), StartupPhase::Idle);
        assert_eq!(state.route(), Route::Auth);
    }

    #[test]
    fn initialize_starts_a_run() {
        let (_dir, environment) = environment();
        let mut state = StartupState {
            is_loading: false,
            error_message: Some("old".to_string()),
            ..Default::default()
        };
        let effect = reduce(StartupAction::InitializeApp, &mut state, &environment);
        assert!(!effect.is_none());
        assert!(state.is_loading);
        assert_eq!(state.error_message, None);
        assert_eq!(state.startup_generation, 1);
        assert_eq!(state.phase(), StartupPhase::Loading);
    }

    #[test]
    fn successful_run_is_applied() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading);
        assert!(state.is_initialized);
        assert!(state.is_authenticated);
        assert_eq!(state.user_name.as_deref(), Some("Ana"));
        assert_eq!(state.phase(), StartupPhase::Ready { authenticated: true });
        assert_eq!(state.greeting(), "Welcome, Ana");
        assert_eq!(state.route(), Route::Home);
    }

    #[test]
    fn failed_run_keeps_a_message() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Err(String::new())),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading);
        assert!(!state.is_initialized);
        assert_eq!(state.error_message.as_deref(), Some(STARTUP_FAILED));
        assert_eq!(state.phase(), StartupPhase::Failed);

        reduce(StartupAction::RetryInitialization, &mut state, &environment);
        assert_eq!(state.phase(), StartupPhase::Loading);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn outdated_runs_are_ignored() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Err("first".to_string())),
            &mut state,
            &environment,
        );
        assert!(state.is_loading);
        assert_eq!(state.error_message, None);

        reduce(
            StartupAction::StartupFinished(2, Ok(outcome(false, None))),
            &mut state,
            &environment,
        );
        assert_eq!(state.phase(), StartupPhase::Ready { authenticated: false });
    }

    #[test]
    fn splash_complete_does_not_come_back() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(StartupAction::SplashComplete, &mut state, &environment);
        assert!(!state.is_loading);
        assert_eq!(state.phase(), StartupPhase::Loading);

        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(false, None))),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading);
        assert!(state.is_initialized);
    }

    #[test]
    fn logout_results() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );

        reduce(
            StartupAction::LogoutFinished(Err("offline".to_string())),
            &mut state,
            &environment,
        );
        assert!(state.is_authenticated);
        assert_eq!(state.user_name.as_deref(), Some("Ana"));
        assert_eq!(
            state.error_message.as_deref(),
            Some("Error signing out: offline")
        );

        reduce(StartupAction::ClearError, &mut state, &environment);
        reduce(StartupAction::LogoutFinished(Ok(())), &mut state, &environment);
        assert!(!state.is_authenticated);
        assert_eq!(state.user_name, None);
        assert_eq!(state.error_message, None);
        assert_eq!(state.phase(), StartupPhase::Ready { authenticated: false });
        assert_eq!(state.greeting(), "Start screen");
    }

    #[test]
    fn logout_during_a_run_is_not_undone() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(StartupAction::LogoutFinished(Ok(())), &mut state, &environment);
        assert!(state.signed_out_during_start);

        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );
        assert!(state.is_initialized);
        assert!(!state.is_authenticated);
        assert_eq!(state.user_name, None);
        assert!(!state.signed_out_during_start);
        assert_eq!(state.phase(), StartupPhase::Ready { authenticated: false });

        // the next run reports the session as it is again
        reduce(StartupAction::RetryInitialization, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(2, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );
        assert!(state.is_authenticated);
        assert_eq!(state.user_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn logout_after_a_run_leaves_the_next_one_alone() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );
        reduce(StartupAction::LogoutFinished(Ok(())), &mut state, &environment);
        assert!(!state.signed_out_during_start);

        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(2, Ok(outcome(true, Some("Ana")))),
            &mut state,
            &environment,
        );
        assert!(state.is_authenticated);
    }

    #[test]
    fn unauthenticated_outcome_drops_name() {
        let (_dir, environment) = environment();
        let mut state = StartupState::default();
        reduce(StartupAction::InitializeApp, &mut state, &environment);
        reduce(
            StartupAction::StartupFinished(1, Ok(outcome(false, Some("Ghost")))),
            &mut state,
            &environment,
        );
        assert_eq!(state.user_name, None);
    }

    fn arb_action() -> impl Strategy<Value = StartupAction> {
        let finished = (0u64..4, any::<bool>(), proptest::option::of("[a-z]{1,6}"), any::<bool>())
            .prop_map(|(generation, authenticated, name, failed)| {
                let result = if failed {
                    Err("boom".to_string())
                } else {
                    Ok(StartupOutcome {
                        is_authenticated: authenticated,
                        user_name: name,
                        theme_preferences: ThemePreferences::default(),
                    })
                };
                StartupAction::StartupFinished(generation, result)
            });
        prop_oneof![
            Just(StartupAction::InitializeApp),
            Just(StartupAction::RetryInitialization),
            Just(StartupAction::SplashComplete),
            Just(StartupAction::Logout),
            Just(StartupAction::ClearError),
            Just(StartupAction::LogoutFinished(Ok(()))),
            Just(StartupAction::LogoutFinished(Err("offline".to_string()))),
            finished,
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(actions in prop::collection::vec(arb_action(), 0..40)) {
            let (_dir, environment) = environment();
            let mut state = StartupState::default();
            check_invariants(&state);
            for action in actions {
                let clear = matches!(action, StartupAction::ClearError);
                let signed_out = state.signed_out_during_start;
                let finishing = matches!(
                    action,
                    StartupAction::StartupFinished(generation, Ok(_))
                        if state.is_starting && generation == state.startup_generation
                );
                reduce(action, &mut state, &environment);
                check_invariants(&state);
                if clear {
                    prop_assert_eq!(state.error_message.clone(), None);
                }
                if finishing && signed_out {
                    prop_assert!(!state.is_authenticated);
                }
                if !state.is_starting {
                    prop_assert!(!state.signed_out_during_start);
                }
            }
        }
    }
}
