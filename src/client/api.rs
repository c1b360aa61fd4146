use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::error;
use url::Url;

use crate::models::Investment;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Investment not found: {0}")]
    NotFound(String),

    #[error("HTTP error! status: {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("local storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// The CRUD contract the front end talks to.
#[async_trait]
pub trait InvestmentApi: Send + Sync {
    async fn get_all_investments(&self) -> Result<Vec<Investment>, ApiError>;

    async fn get_investment(&self, id: &str) -> Result<Investment, ApiError>;

    async fn create_investment(&self, investment: &Investment) -> Result<Investment, ApiError>;

    async fn update_investment(
        &self,
        id: &str,
        investment: &Investment,
    ) -> Result<Investment, ApiError>;

    async fn delete_investment(&self, id: &str) -> Result<Investment, ApiError>;

    async fn check_health(&self) -> Result<HealthStatus, ApiError>;
}

/// HTTP implementation against the tracker's REST API.
pub struct ApiService {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiService {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Parse(format!("invalid API url {}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::Parse(format!("invalid API url {}: not a base URL", base_url)));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parsed,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, keeping any path prefix it has.
    /// Each segment is percent-encoded, so ids may contain `/` or spaces.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Parse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Investment>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        self.send(method, url.clone(), body).await.map_err(|e| {
            error!("API request failed: {}: {}", url, e);
            e
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Investment>,
    ) -> Result<T, ApiError> {
        let path = url.path().to_string();
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(path)),
            status if !status.is_success() => return Err(ApiError::Http(status.as_u16())),
            _ => {}
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

const INVESTMENTS: [&str; 2] = ["api", "investments"];

#[async_trait]
impl InvestmentApi for ApiService {
    async fn get_all_investments(&self) -> Result<Vec<Investment>, ApiError> {
        self.request(Method::GET, &INVESTMENTS, None).await
    }

    async fn get_investment(&self, id: &str) -> Result<Investment, ApiError> {
        self.request(Method::GET, &["api", "investments", id], None)
            .await
    }

    async fn create_investment(&self, investment: &Investment) -> Result<Investment, ApiError> {
        self.request(Method::POST, &INVESTMENTS, Some(investment))
            .await
    }

    async fn update_investment(
        &self,
        id: &str,
        investment: &Investment,
    ) -> Result<Investment, ApiError> {
        self.request(Method::PUT, &["api", "investments", id], Some(investment))
            .await
    }

    async fn delete_investment(&self, id: &str) -> Result<Investment, ApiError> {
        self.request(Method::DELETE, &["api", "investments", id], None)
            .await
    }

    async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        self.request(Method::GET, &["health"], None).await
    }
}
