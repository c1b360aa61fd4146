use std::sync::Arc;

use crate::store::InvestmentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvestmentStore>,
}

impl AppState {
    pub fn new(store: impl InvestmentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
