// gemstone/src/accounts/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::model::User;
use crate::error::GemstoneResult;

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn user(&self, id: Uuid) -> GemstoneResult<Option<User>>;
  /// Emails are stored normalized; callers pass the normalized form.
  async fn user_by_email(&self, email: &str) -> GemstoneResult<Option<User>>;
  async fn insert_user(&self, user: User) -> GemstoneResult<User>;
  async fn update_user(&self, user: User) -> GemstoneResult<User>;
  /// Every user, newest first.
  async fn users(&self) -> GemstoneResult<Vec<User>>;
  async fn recent_customers(&self, limit: usize) -> GemstoneResult<Vec<User>>;
  async fn count_customers(&self) -> GemstoneResult<i64>;
}
