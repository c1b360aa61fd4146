use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::routes::{health, investments};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/investments", investments::router())
        .with_state(state)
}

/// The application router wrapped with request tracing and CORS for the
/// given origins (`*` allows any origin).
pub fn create_app_with_layers(state: AppState, cors_allow: &[String]) -> Router {
    create_app(state)
        .layer(cors_layer(cors_allow))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(cors_allow: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if cors_allow.is_empty() || cors_allow.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors_allow
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}
