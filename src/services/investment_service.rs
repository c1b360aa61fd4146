use crate::errors::AppError;
use crate::models::Investment;
use crate::store::InvestmentStore;

fn prepare(input: Investment) -> Result<Investment, AppError> {
    input.validate()?;
    Ok(input)
}

pub async fn create(
    store: &dyn InvestmentStore,
    input: Investment,
) -> Result<Investment, AppError> {
    let investment = prepare(input)?;
    let created = store.create(investment).await?;
    Ok(created)
}

pub async fn update(
    store: &dyn InvestmentStore,
    id: &str,
    input: Investment,
) -> Result<Investment, AppError> {
    let investment = prepare(input)?;
    let updated = store.update(id, investment).await?;
    Ok(updated)
}

pub async fn fetch_all(store: &dyn InvestmentStore) -> Vec<Investment> {
    store.list_all().await
}

pub async fn fetch_one(store: &dyn InvestmentStore, id: &str) -> Result<Investment, AppError> {
    let investment = store.get_by_id(id).await?;
    Ok(investment)
}

pub async fn delete(store: &dyn InvestmentStore, id: &str) -> Result<Investment, AppError> {
    let removed = store.delete(id).await?;
    Ok(removed)
}
