//! Storage abstractions for the service layer
//!
//! Handlers never touch the backing file directly; they go through
//! [`UserStorage`] so another backend can replace the JSON file.

use async_trait::async_trait;
use models::user::User;

use crate::errors::ServiceError;

pub mod json_file_store;

/// Whole-collection load/save. Each call reads or replaces the full sequence.
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<User>, ServiceError>;
    async fn save(&self, users: &[User]) -> Result<(), ServiceError>;
}
