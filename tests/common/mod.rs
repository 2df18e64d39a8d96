#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::Notify;

use tamplete::environment::types::User;
use tamplete::environment::{Environment, Repository, SessionRepository, TabNavigator};

/// A session whose answers are scripted by the test
pub struct StubSession {
    pub logged_in: Result<bool, String>,
    pub user: Result<User, String>,
    pub logout: Mutex<Result<(), String>>,
    /// When set, the session check waits until notified
    pub gate: Option<Arc<Notify>>,
}

impl StubSession {
    pub fn signed_in(name: &str) -> Self {
        let mut user = User::new(&format!("{}@example.org", name.to_lowercase()));
        user.name = name.to_string();
        Self {
            logged_in: Ok(true),
            user: Ok(user),
            logout: Mutex::new(Ok(())),
            gate: None,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            logged_in: Ok(false),
            user: Err("No user is signed in".to_string()),
            ..Self::signed_in("nobody")
        }
    }

    pub fn failing_check() -> Self {
        Self {
            logged_in: Err("datastore corrupted".to_string()),
            ..Self::signed_in("Ana")
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn failing_logout(self, message: &str) -> Self {
        if let Ok(mut logout) = self.logout.lock() {
            *logout = Err(message.to_string());
        }
        self
    }
}

#[async_trait]
impl SessionRepository for StubSession {
    fn is_logged_in(&self) -> BoxStream<'static, Result<bool, String>> {
        let answer = self.logged_in.clone();
        let gate = self.gate.clone();
        stream::once(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            answer
        })
        .boxed()
    }

    fn current_user(&self) -> BoxStream<'static, Result<User, String>> {
        stream::iter([self.user.clone()]).boxed()
    }

    async fn login(&self, _user: User) -> Result<(), String> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), String> {
        self.logout
            .lock()
            .map_err(|e| format!("{e:?}"))?
            .clone()
    }
}

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub navigator: TabNavigator,
    pub environment: Environment,
}

pub fn fixture(session: StubSession) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = Repository::with_directory(dir.path()).expect("repository");
    let navigator = TabNavigator::default();
    let environment = Environment::new(repository, Arc::new(navigator.clone()))
        .with_session(Arc::new(session));
    Fixture {
        dir,
        navigator,
        environment,
    }
}
