use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::AppState;
use crate::boot;
use crate::db::DbError;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log a store error and return a sanitized response to the client.
///
/// Missing records surface as 404 with their message; anything else is logged
/// in full and reported as a generic 500.
fn store_error(e: DbError) -> (StatusCode, String) {
    match e {
        DbError::NotFound { .. } => {
            tracing::warn!("Not found: {}", e);
            (StatusCode::NOT_FOUND, e.to_string())
        }
        other => {
            tracing::error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn module_not_found(name: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Module '{}' not found", name))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Modules
// ============================================================

pub async fn list_modules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModuleSummary>>, (StatusCode, String)> {
    let modules = state.db.get_registered_modules().map_err(store_error)?;
    Ok(Json(modules.iter().map(ModuleSummary::from).collect()))
}

pub async fn get_module(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RegisteredModule>, (StatusCode, String)> {
    state
        .db
        .get_registered_module(&name)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| module_not_found(&name))
}

/// Desk and website includes of one module, each list in load order.
#[derive(Debug, Serialize)]
pub struct ModuleAssetsResponse {
    pub module: String,
    pub asset_includes: AssetIncludes,
    pub web_includes: AssetIncludes,
}

pub async fn list_module_assets(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModuleAssetsResponse>, (StatusCode, String)> {
    if state
        .db
        .get_registered_module(&name)
        .map_err(store_error)?
        .is_none()
    {
        return Err(module_not_found(&name));
    }

    let mut response = ModuleAssetsResponse {
        module: name.clone(),
        asset_includes: AssetIncludes::default(),
        web_includes: AssetIncludes::default(),
    };

    for asset in state.db.get_module_assets(&name).map_err(store_error)? {
        let includes = match asset.scope {
            AssetScope::App => &mut response.asset_includes,
            AssetScope::Web => &mut response.web_includes,
        };
        match asset.kind {
            AssetKind::Script => includes.scripts.push(asset.path),
            AssetKind::Style => includes.styles.push(asset.path),
        }
    }

    Ok(Json(response))
}

pub async fn list_module_doctypes(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    if state
        .db
        .get_registered_module(&name)
        .map_err(store_error)?
        .is_none()
    {
        return Err(module_not_found(&name));
    }

    state
        .db
        .get_module_doctypes(&name)
        .map(Json)
        .map_err(store_error)
}

pub async fn list_assets(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegisteredAsset>>, (StatusCode, String)> {
    state.db.get_all_assets().map(Json).map_err(store_error)
}

// ============================================================
// Fixtures
// ============================================================

pub async fn list_fixture_records(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<FixtureRecord>>, (StatusCode, String)> {
    state
        .db
        .get_fixture_records(&kind)
        .map(Json)
        .map_err(store_error)
}

// ============================================================
// Settings
// ============================================================

pub async fn get_settings(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SettingsRecord>, (StatusCode, String)> {
    state
        .db
        .get_settings(&name)
        .map_err(store_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Settings record '{}' not found", name),
        ))
}

pub async fn get_boot_info(
    State(state): State<AppState>,
) -> Result<Json<BootInfo>, (StatusCode, String)> {
    let settings = state
        .db
        .get_settings(WEBSITE_SETTINGS)
        .map_err(store_error)?;
    Ok(Json(boot::boot_session(
        settings.as_ref(),
        &state.site_config,
    )))
}
