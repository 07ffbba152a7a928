mod handlers;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SiteConfig;
use crate::db::Database;

/// Shared state of the host API.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub site_config: SiteConfig,
}

pub fn create_router(db: Database, site_config: SiteConfig) -> Router {
    let cors = cors_layer(&site_config.allow_cors);
    let state = AppState { db, site_config };

    let api = Router::new()
        .route("/health", get(handlers::health))
        // Modules
        .route("/modules", get(handlers::list_modules))
        .route("/modules/{name}", get(handlers::get_module))
        .route("/modules/{name}/assets", get(handlers::list_module_assets))
        .route("/modules/{name}/doctypes", get(handlers::list_module_doctypes))
        // Assets across all modules, in load order
        .route("/assets", get(handlers::list_assets))
        // Fixtures
        .route("/fixtures/{kind}", get(handlers::list_fixture_records))
        // Settings
        .route("/settings/{name}", get(handlers::get_settings))
        .route("/boot", get(handlers::get_boot_info));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Restrict cross-origin reads to `origins`, or allow any origin when empty.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}
