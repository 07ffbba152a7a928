use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssetKind, AssetScope, ModuleManifest};

/// A manifest as persisted into a site store.
///
/// The manifest fields are flattened into the JSON response alongside the
/// registration metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredModule {
    pub registration_id: Uuid,
    /// Position in the registry the module was installed from.
    pub position: i64,
    #[serde(flatten)]
    pub manifest: ModuleManifest,
    pub registered_at: DateTime<Utc>,
}

/// One asset include row, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAsset {
    pub module: String,
    pub scope: AssetScope,
    pub kind: AssetKind,
    pub position: i64,
    pub path: String,
}

/// Summary line used by module listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub name: String,
    pub title: String,
    pub version: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<&RegisteredModule> for ModuleSummary {
    fn from(module: &RegisteredModule) -> Self {
        Self {
            name: module.manifest.name.clone(),
            title: module.manifest.title.clone(),
            version: module.manifest.version.clone(),
            icon: module.manifest.icon.clone(),
            color: module.manifest.color.clone(),
        }
    }
}
