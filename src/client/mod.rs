//! Front-end side of the tracker: a local cache of the collection, the
//! add/edit form and the CRUD round-trips that keep both in step with the
//! backend.

pub mod api;
pub mod form;
pub mod local;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{total_value, Allocation, Investment};

pub use api::{ApiError, ApiService, HealthStatus, InvestmentApi};
pub use form::{FormError, FormField, InvestmentForm};
pub use local::{LocalApi, LocalStorage};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("No investment form is open")]
    NoFormOpen,
}

pub struct InvestmentClient<A: InvestmentApi> {
    api: A,
    investments: Vec<Investment>,
    loading: bool,
    error: Option<String>,
    form: Option<InvestmentForm>,
}

impl<A: InvestmentApi> InvestmentClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            investments: Vec::new(),
            loading: false,
            error: None,
            form: None,
        }
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn find(&self, id: &str) -> Option<&Investment> {
        self.investments.iter().find(|inv| inv.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed operation, if it has not been dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn form(&self) -> Option<&InvestmentForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut InvestmentForm> {
        self.form.as_mut()
    }

    fn fail<T>(&mut self, err: ClientError) -> Result<T, ClientError> {
        self.error = Some(err.to_string());
        Err(err)
    }

    /// Replaces the cache with the backend's collection. On failure the
    /// previous cache is kept.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.get_all_investments().await;
        self.loading = false;

        match result {
            Ok(investments) => {
                info!("Loaded {} investments", investments.len());
                self.investments = investments;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load investments: {}", e);
                self.fail(ClientError::Api(e))
            }
        }
    }

    pub fn begin_create(&mut self) -> &mut InvestmentForm {
        self.form.insert(InvestmentForm::new(Local::now().date_naive()))
    }

    pub fn begin_edit(&mut self, investment: &Investment) -> &mut InvestmentForm {
        self.form.insert(InvestmentForm::from_investment(investment))
    }

    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Submits the open form. The cache only changes once the backend has
    /// accepted the record; on any failure the form stays open with its
    /// inputs so the user can retry.
    pub async fn save(&mut self) -> Result<Investment, ClientError> {
        let Some(form) = self.form.as_ref() else {
            return self.fail(ClientError::NoFormOpen);
        };
        let editing_id = form.editing_id().map(str::to_string);
        let investment = match form.submit() {
            Ok(investment) => investment,
            Err(e) => return self.fail(ClientError::Validation(e)),
        };

        let result = match &editing_id {
            Some(id) => self.api.update_investment(id, &investment).await,
            None => {
                let investment = investment.with_id(Uuid::new_v4().to_string());
                self.api.create_investment(&investment).await
            }
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                error!("Failed to save investment: {}", e);
                return self.fail(ClientError::Api(e));
            }
        };

        match editing_id {
            Some(id) => match self.investments.iter_mut().find(|inv| inv.id == id) {
                Some(slot) => *slot = saved.clone(),
                None => self.investments.push(saved.clone()),
            },
            None => self.investments.push(saved.clone()),
        }
        self.form = None;
        self.error = None;
        Ok(saved)
    }

    pub async fn remove(&mut self, id: &str) -> Result<Investment, ClientError> {
        match self.api.delete_investment(id).await {
            Ok(removed) => {
                self.investments.retain(|inv| inv.id != id);
                self.error = None;
                Ok(removed)
            }
            Err(e) => {
                error!("Failed to delete investment {}: {}", id, e);
                self.fail(ClientError::Api(e))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        Ok(self.api.check_health().await?)
    }

    pub fn total_value(&self) -> f64 {
        total_value(&self.investments)
    }

    pub fn allocation(&self) -> Allocation {
        Allocation::from_investments(&self.investments)
    }
}
