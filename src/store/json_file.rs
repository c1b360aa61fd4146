use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{InvestmentStore, StoreError};
use crate::models::seed::sample_investments;
use crate::models::Investment;

/// On-disk layout of the database file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    investments: Vec<Investment>,
}

/// Keeps the whole collection in one pretty-printed JSON document and
/// rewrites it after every change.
pub struct JsonFileStore {
    path: PathBuf,
    // Held for every access so a read never sees a half-written file.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Opens the store at `path`, writing the sample holdings when the file
    /// does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.init().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let db = Database {
            investments: sample_investments(),
        };
        self.write(&db).await?;
        info!("Database initialized with sample data at {}", self.path.display());
        Ok(())
    }

    async fn read(&self) -> Result<Database, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Database file {} is missing, treating it as empty", self.path.display());
                Ok(Database::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, db: &Database) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(db)?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            error!("Error writing database {}: {}", self.path.display(), e);
            StoreError::from(e)
        })
    }
}

#[async_trait]
impl InvestmentStore for JsonFileStore {
    async fn list_all(&self) -> Vec<Investment> {
        let _guard = self.lock.lock().await;
        match self.read().await {
            Ok(db) => db.investments,
            Err(e) => {
                error!("Error reading database {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Investment, StoreError> {
        let _guard = self.lock.lock().await;
        let db = self.read().await?;
        db.investments
            .into_iter()
            .find(|inv| inv.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, mut investment: Investment) -> Result<Investment, StoreError> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let taken = db.investments.iter().any(|inv| inv.id == investment.id);
        if investment.id.trim().is_empty() || taken {
            if taken {
                warn!("Investment id {} already in use, assigning a new one", investment.id);
            }
            investment.id = Uuid::new_v4().to_string();
        }

        db.investments.push(investment.clone());
        self.write(&db).await?;
        Ok(investment)
    }

    async fn update(&self, id: &str, mut investment: Investment) -> Result<Investment, StoreError> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let slot = db
            .investments
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        investment.id = id.to_string();
        *slot = investment.clone();

        self.write(&db).await?;
        Ok(investment)
    }

    async fn delete(&self, id: &str) -> Result<Investment, StoreError> {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;

        let index = db
            .investments
            .iter()
            .position(|inv| inv.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = db.investments.remove(index);

        self.write(&db).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentKind;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn cash(name: &str, amount: f64) -> Investment {
        Investment::new(
            name,
            amount,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            InvestmentKind::Cash {
                location: "Wallet".into(),
                currency: "INR".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_open_seeds_missing_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).await.unwrap();

        let all = store.list_all().await;
        assert_eq!(all.len(), 5);
        assert_eq!(store.get_by_id("4").await.unwrap().name, "Government Bond 2030");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["investments"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_open_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{ "investments": [] }"#).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).await.unwrap();

        let first = store.create(cash("a", 1.0)).await.unwrap();
        assert!(!first.id.is_empty());

        // Colliding id gets replaced.
        let second = store.create(cash("b", 2.0).with_id("1")).await.unwrap();
        assert_ne!(second.id, "1");
        assert_ne!(second.id, first.id);

        let supplied = store.create(cash("c", 3.0).with_id("client-42")).await.unwrap();
        assert_eq!(supplied.id, "client-42");

        assert_eq!(store.list_all().await.len(), 8);
    }

    #[tokio::test]
    async fn test_update_forces_path_id() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).await.unwrap();

        let updated = store.update("5", cash("Renamed", 75.0).with_id("999")).await.unwrap();
        assert_eq!(updated.id, "5");

        let fetched = store.get_by_id("5").await.unwrap();
        assert_eq!(fetched, updated);
        assert!(store.get_by_id("999").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found_and_change_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).await.unwrap();
        let before = store.list_all().await;

        assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.update("nope", cash("x", 1.0)).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.get_by_id("nope").await, Err(StoreError::NotFound(_))));

        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn test_sequence_of_operations_has_net_effect() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{ "investments": [] }"#).unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();

        let a = store.create(cash("a", 1.0)).await.unwrap();
        let b = store.create(cash("b", 2.0)).await.unwrap();
        store.update(&a.id, cash("a2", 10.0)).await.unwrap();
        let removed = store.delete(&b.id).await.unwrap();
        assert_eq!(removed.id, b.id);

        let all = store.list_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[0].name, "a2");
        assert_eq!(all[0].amount, 10.0);

        // A fresh store over the same file sees the same data.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.list_all().await, all);
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty_but_refuses_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(store.list_all().await.is_empty());
        assert!(matches!(
            store.create(cash("a", 1.0)).await,
            Err(StoreError::Serialization(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_during_writes_see_whole_collection() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path().join("db.json")).await.unwrap());
        for i in 0..300 {
            store.create(cash(&format!("bulk-{}", i), i as f64)).await.unwrap();
        }
        let expected = store.list_all().await.len();
        assert_eq!(expected, 305);

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..100 {
                    store.update("1", cash("rewritten", i as f64)).await.unwrap();
                }
            })
        };

        loop {
            assert_eq!(store.list_all().await.len(), expected);
            assert!(store.get_by_id("5").await.is_ok());
            if writer.is_finished() {
                break;
            }
        }
        writer.await.unwrap();
        assert_eq!(store.get_by_id("1").await.unwrap().amount, 99.0);
    }
}
