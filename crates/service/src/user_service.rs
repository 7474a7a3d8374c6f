use std::collections::HashMap;
use std::sync::Arc;

use models::user::{User, UserInput};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::errors::ServiceError;
use crate::storage::UserStorage;

/// User registry operations over a [`UserStorage`].
///
/// Every call loads the collection fresh and, for mutations, saves it back.
/// The whole cycle runs under one lock per service, so concurrent requests
/// against the same store cannot lose each other's writes.
pub struct UserService {
    storage: Arc<dyn UserStorage>,
    lock: Mutex<()>,
}

impl UserService {
    pub fn new(storage: Arc<dyn UserStorage>) -> Self {
        Self { storage, lock: Mutex::new(()) }
    }

    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        self.storage.load().await.inspect_err(|e| error!(error = %e, "failed to load users"))
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        self.storage.save(users).await.inspect_err(|e| error!(error = %e, "failed to save users"))
    }

    /// All users in stored order.
    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Users whose every filtered field, stringified, equals the expected
    /// value ignoring case. Unknown keys compare against the empty string.
    pub async fn search(&self, filters: &HashMap<String, String>) -> Result<Vec<User>, ServiceError> {
        let _guard = self.lock.lock().await;
        let users = self.load().await?;
        let wanted: Vec<(&str, String)> =
            filters.iter().map(|(k, v)| (k.as_str(), v.to_lowercase())).collect();

        let mut found = Vec::new();
        for user in users {
            let doc = serde_json::to_value(&user).map_err(|e| ServiceError::StorageRead(e.to_string()))?;
            let hit = wanted
                .iter()
                .all(|(key, expected)| search_text(doc.get(*key)).to_lowercase() == *expected);
            if hit {
                found.push(user);
            }
        }
        Ok(found)
    }

    /// First user with exactly this username.
    pub async fn get(&self, username: &str) -> Result<User, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Validate a raw body, append the new record and persist.
    pub async fn create(&self, body: &[u8]) -> Result<User, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        let input = validate_payload(&users, body, None)?;

        let user = User::create(input);
        users.push(user.clone());
        self.save(&users).await?;
        info!(event = "user_created", username = %user.username, id = %user.id, "user created");
        Ok(user)
    }

    /// Replace every field but the identifier of the user named `username`.
    pub async fn update(&self, username: &str, body: &[u8]) -> Result<User, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        let idx = users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| ServiceError::not_found("User"))?;
        let input = validate_payload(&users, body, Some(username))?;

        users[idx].apply(input);
        let updated = users[idx].clone();
        self.save(&users).await?;
        info!(event = "user_updated", from = %username, username = %updated.username, "user updated");
        Ok(updated)
    }

    /// Remove the first user named `username`; returns the removed record.
    pub async fn delete(&self, username: &str) -> Result<User, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        let idx = users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let removed = users.remove(idx);
        self.save(&users).await?;
        info!(event = "user_deleted", username = %removed.username, "user deleted");
        Ok(removed)
    }
}

/// Shape checks plus username uniqueness. `current` is the username being
/// updated; a payload keeping that username skips the uniqueness check.
pub fn validate_payload(users: &[User], body: &[u8], current: Option<&str>) -> Result<UserInput, ServiceError> {
    let input = UserInput::from_slice(body)?;
    if current == Some(input.username.as_str()) {
        return Ok(input);
    }
    if users.iter().any(|u| u.username == input.username) {
        return Err(ServiceError::Validation("Username already exists.".into()));
    }
    Ok(input)
}

/// String form used by search comparisons.
fn search_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
