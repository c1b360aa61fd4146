use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use super::api::{ApiError, HealthStatus, InvestmentApi};
use crate::models::seed::sample_investments;
use crate::models::Investment;

pub const LOCAL_STORAGE_KEY: &str = "finance_tracker_investments";

/// String key-value storage backed by one JSON object on disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn entries(&self) -> Result<BTreeMap<String, String>, ApiError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| ApiError::Storage(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.entries().await?.remove(key))
    }

    pub async fn set_item(&self, key: &str, value: String) -> Result<(), ApiError> {
        let mut entries = self.entries().await?;
        entries.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&entries)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }
}

/// Keeps the collection on this machine instead of talking to a server. The
/// whole list is stored under [`LOCAL_STORAGE_KEY`] and rewritten after every
/// change.
pub struct LocalApi {
    storage: LocalStorage,
    lock: Mutex<()>,
}

impl LocalApi {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Vec<Investment>, ApiError> {
        let saved = match self.storage.get_item(LOCAL_STORAGE_KEY).await? {
            Some(saved) => saved,
            None => {
                info!("No saved investments in {}, starting from samples", self.storage.path().display());
                return Ok(sample_investments());
            }
        };
        match serde_json::from_str(&saved) {
            Ok(investments) => Ok(investments),
            Err(e) => {
                error!("Failed to parse investments from local storage: {}", e);
                Ok(sample_investments())
            }
        }
    }

    async fn write(&self, investments: &[Investment]) -> Result<(), ApiError> {
        let raw = serde_json::to_string(investments).map_err(|e| ApiError::Storage(e.to_string()))?;
        self.storage.set_item(LOCAL_STORAGE_KEY, raw).await.map_err(|e| {
            error!("Failed to save investments to local storage: {}", e);
            e
        })
    }
}

#[async_trait]
impl InvestmentApi for LocalApi {
    async fn get_all_investments(&self) -> Result<Vec<Investment>, ApiError> {
        self.read().await
    }

    async fn get_investment(&self, id: &str) -> Result<Investment, ApiError> {
        self.read()
            .await?
            .into_iter()
            .find(|inv| inv.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn create_investment(&self, investment: &Investment) -> Result<Investment, ApiError> {
        let _guard = self.lock.lock().await;
        let mut investments = self.read().await?;

        let mut stored = investment.clone();
        if stored.id.is_empty() || investments.iter().any(|inv| inv.id == stored.id) {
            stored.id = Uuid::new_v4().to_string();
        }
        investments.push(stored.clone());
        self.write(&investments).await?;
        Ok(stored)
    }

    async fn update_investment(
        &self,
        id: &str,
        investment: &Investment,
    ) -> Result<Investment, ApiError> {
        let _guard = self.lock.lock().await;
        let mut investments = self.read().await?;

        let slot = investments
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        let updated = investment.clone().with_id(id);
        *slot = updated.clone();

        self.write(&investments).await?;
        Ok(updated)
    }

    async fn delete_investment(&self, id: &str) -> Result<Investment, ApiError> {
        let _guard = self.lock.lock().await;
        let mut investments = self.read().await?;

        let index = investments
            .iter()
            .position(|inv| inv.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        let removed = investments.remove(index);

        self.write(&investments).await?;
        Ok(removed)
    }

    async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        self.storage.entries().await?;
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentKind;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn bond() -> Investment {
        Investment::new(
            "GOI Savings Bond",
            100000.0,
            NaiveDate::from_ymd_opt(2023, 3, 22).unwrap(),
            InvestmentKind::Bond {
                issuer: "Govt of India".into(),
                coupon_rate: 7.75,
                maturity_date: NaiveDate::from_ymd_opt(2030, 3, 22),
            },
        )
    }

    #[tokio::test]
    async fn test_storage_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("local.json"));

        assert_eq!(storage.get_item("theme").await.unwrap(), None);
        storage.set_item("theme", "dark".into()).await.unwrap();
        storage.set_item("lang", "en".into()).await.unwrap();

        assert_eq!(storage.get_item("theme").await.unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get_item("lang").await.unwrap().as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_empty_storage_starts_from_samples() {
        let dir = tempdir().unwrap();
        let api = LocalApi::new(LocalStorage::new(dir.path().join("local.json")));

        let all = api.get_all_investments().await.unwrap();
        assert_eq!(all, sample_investments());
    }

    #[tokio::test]
    async fn test_changes_are_written_under_the_key() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("local.json"));
        let api = LocalApi::new(storage.clone());

        let created = api.create_investment(&bond()).await.unwrap();
        assert!(!created.id.is_empty());

        let saved = storage.get_item(LOCAL_STORAGE_KEY).await.unwrap().unwrap();
        let saved: Vec<Investment> = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved.len(), 6);
        assert_eq!(saved.last(), Some(&created));

        let removed = api.delete_investment("1").await.unwrap();
        assert_eq!(removed.id, "1");
        assert!(matches!(api.get_investment("1").await, Err(ApiError::NotFound(_))));
        assert!(matches!(api.delete_investment("1").await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_path_id() {
        let dir = tempdir().unwrap();
        let api = LocalApi::new(LocalStorage::new(dir.path().join("local.json")));

        let updated = api.update_investment("4", &bond().with_id("other")).await.unwrap();
        assert_eq!(updated.id, "4");
        assert_eq!(api.get_investment("4").await.unwrap().name, "GOI Savings Bond");
    }

    #[tokio::test]
    async fn test_unreadable_collection_falls_back_to_samples() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("local.json"));
        storage.set_item(LOCAL_STORAGE_KEY, "[oops".into()).await.unwrap();

        let api = LocalApi::new(storage);
        assert_eq!(api.get_all_investments().await.unwrap().len(), 5);
    }
}
