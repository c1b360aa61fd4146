pub mod json_file;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Investment;

pub use json_file::JsonFileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("investment {0} not found")]
    NotFound(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable CRUD over the investment collection, keyed by `id`.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Every stored record. Read failures are logged and yield an empty list.
    async fn list_all(&self) -> Vec<Investment>;

    async fn get_by_id(&self, id: &str) -> Result<Investment, StoreError>;

    /// Stores a new record, assigning an id when the supplied one is missing
    /// or already taken.
    async fn create(&self, investment: Investment) -> Result<Investment, StoreError>;

    /// Replaces the record at `id`. The stored record always carries `id`,
    /// whatever the body said.
    async fn update(&self, id: &str, investment: Investment) -> Result<Investment, StoreError>;

    async fn delete(&self, id: &str) -> Result<Investment, StoreError>;
}
