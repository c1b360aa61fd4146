use axum::extract::{Path, State};
use http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::Investment;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_investment).get(fetch_investments))
        .route(
            "/:id",
            get(get_investment)
                .put(update_investment)
                .delete(delete_investment),
        )
}

#[axum::debug_handler]
pub async fn create_investment(
    State(state): State<AppState>,
    Json(data): Json<Investment>,
) -> Result<(StatusCode, Json<Investment>), AppError> {
    info!("POST /api/investments - Creating new {} investment", data.investment_type());
    let investment = services::investment_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create investment: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(investment)))
}

pub async fn fetch_investments(State(state): State<AppState>) -> Json<Vec<Investment>> {
    info!("GET /api/investments - Fetching all investments");
    let investments = services::investment_service::fetch_all(state.store.as_ref()).await;
    Json(investments)
}

pub async fn get_investment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Investment>, AppError> {
    info!("GET /api/investments/{} - Fetching investment", id);
    let investment = services::investment_service::fetch_one(state.store.as_ref(), &id)
        .await
        .map_err(|e| {
            error!("Failed to fetch investment {}: {}", id, e);
            e
        })?;
    Ok(Json(investment))
}

pub async fn update_investment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<Investment>,
) -> Result<Json<Investment>, AppError> {
    info!("PUT /api/investments/{} - Updating investment", id);
    let investment = services::investment_service::update(state.store.as_ref(), &id, data)
        .await
        .map_err(|e| {
            error!("Failed to update investment {}: {}", id, e);
            e
        })?;
    Ok(Json(investment))
}

pub async fn delete_investment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Investment>, AppError> {
    info!("DELETE /api/investments/{} - Deleting investment", id);
    let removed = services::investment_service::delete(state.store.as_ref(), &id)
        .await
        .map_err(|e| {
            error!("Failed to delete investment {}: {}", id, e);
            e
        })?;
    Ok(Json(removed))
}
