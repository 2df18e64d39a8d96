use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_slice, to_string_pretty};

use super::session::SessionRepository;
use super::types::{PendingChange, StartupConfig, ThemePreferences, User};
use crate::helper::ResultExt;
use crate::store::Publisher;

const SESSION_PATH: &str = "session.json";
const THEME_PATH: &str = "theme.json";
const PENDING_PATH: &str = "pending.json";
const STARTUP_PATH: &str = "startup.json";

/// JSON files in the application data directory.
///
/// The session is kept in memory as well and published, so that session
/// streams see logins and logouts as they happen.
#[derive(Clone)]
pub struct Repository {
    directory: PathBuf,
    session: Publisher<Option<User>>,
    startup: StartupConfig,
    // serializes read-modify-write of the pending queue
    pending: Arc<tokio::sync::Mutex<()>>,
}

impl Repository {
    pub fn new() -> Result<Self, String> {
        Self::with_directory(data_directory()?)
    }

    pub fn with_directory(directory: impl Into<PathBuf>) -> Result<Self, String> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)
            .map_err(|e| format!("Could not create directory {}: {e:?}", directory.display()))?;

        let session: Option<User> = read(&directory.join(SESSION_PATH)).unwrap_or_else(|e| {
            log::error!("Ignoring stored session: {e}");
            None
        });
        let startup = read(&directory.join(STARTUP_PATH))
            .unwrap_or_else(|e| {
                log::error!("Ignoring startup configuration: {e}");
                None
            })
            .unwrap_or_default();

        Ok(Self {
            directory,
            session: Publisher::new(session),
            startup,
            pending: Arc::default(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn startup_config(&self) -> StartupConfig {
        self.startup.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.session.value()
    }

    /// Stored preferences, or the defaults if none were saved yet.
    /// A file that can't be parsed is an error.
    pub async fn theme_preferences(&self) -> Result<ThemePreferences, String> {
        let theme = read_async(&self.path(THEME_PATH)).await?;
        Ok(theme.unwrap_or_default())
    }

    pub async fn set_theme_preferences(&self, theme: &ThemePreferences) -> Result<(), String> {
        write_async(&self.path(THEME_PATH), theme).await
    }

    pub async fn queue_change(&self, id: &str, payload: serde_json::Value) -> Result<PendingChange, String> {
        let _guard = self.pending.lock().await;
        let path = self.path(PENDING_PATH);
        let mut changes: Vec<PendingChange> = read_async(&path).await?.unwrap_or_default();
        let change = PendingChange {
            id: id.to_string(),
            created: Utc::now(),
            payload,
        };
        changes.push(change.clone());
        write_async(&path, &changes).await?;
        Ok(change)
    }

    pub async fn pending_changes(&self) -> Result<Vec<PendingChange>, String> {
        let _guard = self.pending.lock().await;
        Ok(read_async(&self.path(PENDING_PATH)).await?.unwrap_or_default())
    }

    /// Flush the offline queue. Returns how many changes were synced.
    pub async fn sync_offline_data(&self) -> Result<usize, String> {
        let _guard = self.pending.lock().await;
        let path = self.path(PENDING_PATH);
        let changes: Vec<PendingChange> = read_async(&path).await?.unwrap_or_default();
        if changes.is_empty() {
            return Ok(0);
        }
        for change in &changes {
            log::debug!("Synced change {} from {}", change.id, change.created);
        }
        write_async(&path, &Vec::<PendingChange>::new()).await?;
        Ok(changes.len())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("directory", &self.directory)
            .finish()
    }
}

#[async_trait]
impl SessionRepository for Repository {
    fn is_logged_in(&self) -> BoxStream<'static, Result<bool, String>> {
        self.session
            .stream()
            .map(|user| Ok(user.is_some()))
            .boxed()
    }

    fn current_user(&self) -> BoxStream<'static, Result<User, String>> {
        self.session
            .stream()
            .map(|user| user.ok_or_else(|| "No user is signed in".to_string()))
            .boxed()
    }

    async fn login(&self, user: User) -> Result<(), String> {
        write_async(&self.path(SESSION_PATH), &user).await?;
        self.session.set(Some(user));
        Ok(())
    }

    async fn logout(&self) -> Result<(), String> {
        let path = self.path(SESSION_PATH);
        match tokio::fs::remove_file(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(format!("Could not remove {}: {e:?}", path.display())),
        }
        self.session.set(None);
        Ok(())
    }
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    };
    let data =
        std::fs::read(path).map_err(|e| format!("Could not read {}: {e:?}", path.display()))?;
    let obj: T =
        from_slice(&data).map_err(|e| format!("Could not parse {}: {e:?}", path.display()))?;
    Ok(Some(obj))
}

async fn read_async<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("Could not read {}: {e:?}", path.display())),
    };
    let obj: T =
        from_slice(&data).map_err(|e| format!("Could not parse {}: {e:?}", path.display()))?;
    Ok(Some(obj))
}

async fn write_async<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let data = to_string_pretty(&value).map_err(|e| format!("Could not parse value:{e:?}"))?;
    tokio::fs::write(path, data)
        .await
        .map_err(|e| format!("Could not write to {}: {e:?}", path.display()))
}

fn data_directory() -> Result<PathBuf, String> {
    use directories_next::ProjectDirs;
    ProjectDirs::from("org", "override", "tamplete")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| "Couldn't find a folder to save data".to_string())
        .string_error("data_directory")
}
