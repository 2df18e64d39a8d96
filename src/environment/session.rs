use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::types::User;

/// Where the signed in user lives.
///
/// The query methods return lazy streams; callers usually only care about
/// the first item.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    fn is_logged_in(&self) -> BoxStream<'static, Result<bool, String>>;

    fn current_user(&self) -> BoxStream<'static, Result<User, String>>;

    async fn login(&self, user: User) -> Result<(), String>;

    async fn logout(&self) -> Result<(), String>;
}
