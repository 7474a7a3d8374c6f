use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use models::user::User;
use serde::Serialize;
use tokio::fs;

use super::UserStorage;
use crate::errors::ServiceError;

/// JSON file-backed user collection.
///
/// The file holds a top-level array of user records. Nothing is cached:
/// `load` re-reads the file and `save` replaces it wholesale.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { file_path: path.into() })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.file_path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

/// Pretty-print with 4-space indentation, the layout the file is kept in.
pub fn to_file_bytes(users: &[User]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    users.serialize(&mut ser)?;
    Ok(buf)
}

#[async_trait]
impl UserStorage for JsonFileStore {
    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::StorageRead(format!("{}: {e}", self.file_path.display())))?;
        let records: Vec<serde_json::Value> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::StorageRead(format!("{}: {e}", self.file_path.display())))?;
        // Parse per record so a bad entry is reported by its index.
        records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                serde_json::from_value(record).map_err(|e| {
                    ServiceError::StorageRead(format!("{}: record {idx}: {e}", self.file_path.display()))
                })
            })
            .collect()
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        let data = to_file_bytes(users).map_err(|e| ServiceError::StorageWrite(e.to_string()))?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::StorageWrite(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::StorageWrite(format!("{}: {e}", self.file_path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
    {
        "_id": {
            "$oid": "65a1f0c2e4b0a1b2c3d4e5f6"
        },
        "username": "alice",
        "password": "p",
        "admin": false,
        "name": "Alice",
        "date_of_birth": "2000-01-01",
        "email": "a@x.com",
        "roles": [
            "student"
        ],
        "courses": [
            "cs101"
        ]
    }
]"#;

    fn tmp_file() -> PathBuf {
        std::env::temp_dir().join(format!("json_file_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn save_of_load_is_byte_stable() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        fs::write(&path, SAMPLE).await?;
        let store = JsonFileStore::new(&path);

        let users = store.load().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");

        store.save(&users).await?;
        assert_eq!(fs::read_to_string(&path).await?, SAMPLE);
        assert!(fs::metadata(store.temp_path()).await.is_err());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let store = JsonFileStore::new(tmp_file());
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageRead(_)));
    }

    #[tokio::test]
    async fn invalid_json_is_a_read_error() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        fs::write(&path, "{\"users\": ").await?;
        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageRead(_)));
        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn bad_record_is_reported_by_index() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let legacy = r#"[
    {"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "username": "alice", "password": "p", "admin": false,
     "name": "Alice", "date_of_birth": "", "email": "", "roles": [], "courses": []},
    {"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f7"}, "username": 42, "password": "p", "admin": true,
     "name": "N", "date_of_birth": "", "email": "", "roles": [], "courses": []}
]"#;
        fs::write(&path, legacy).await?;
        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        match err {
            ServiceError::StorageRead(msg) => assert!(msg.contains("record 1"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn unwritable_location_is_a_write_error() {
        let dir = std::env::temp_dir().join(format!("missing_dir_{}", uuid::Uuid::new_v4()));
        let store = JsonFileStore::new(dir.join("users.json"));
        let err = store.save(&[]).await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageWrite(_)));
    }

    #[tokio::test]
    async fn empty_collection_round_trips() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let store = JsonFileStore::new(&path);
        store.save(&[]).await?;
        assert_eq!(fs::read_to_string(&path).await?, "[]");
        assert!(store.load().await?.is_empty());
        let _ = fs::remove_file(&path).await;
        Ok(())
    }
}
