//! Loading and validation of module manifests.
//!
//! Manifests are TOML documents, one per module. They are parsed, checked for
//! required fields and supported fixture filters, then gathered into a
//! [`ModuleRegistry`], which rejects duplicate module names. Any failure aborts
//! the whole load so a host never sees a half-registered set of modules.

mod error;
mod registry;
pub mod tree_render;

use std::path::Path;

pub use error::ManifestError;
pub use registry::ModuleRegistry;

use crate::models::{FixtureFilter, ModuleManifest};

/// Manifests compiled into the binary, as `(file name, source)`.
const BUNDLED: &[(&str, &str)] = &[
    (
        "orchestrator_crm.toml",
        include_str!("../../apps/orchestrator_crm.toml"),
    ),
    (
        "orchestrator_helpdesk.toml",
        include_str!("../../apps/orchestrator_helpdesk.toml"),
    ),
    (
        "orchestrator_hr.toml",
        include_str!("../../apps/orchestrator_hr.toml"),
    ),
    (
        "orchestrator_gameplan.toml",
        include_str!("../../apps/orchestrator_gameplan.toml"),
    ),
    (
        "orchestrator_insights.toml",
        include_str!("../../apps/orchestrator_insights.toml"),
    ),
    (
        "orchestrator_docs.toml",
        include_str!("../../apps/orchestrator_docs.toml"),
    ),
    (
        "orchestrator_theme.toml",
        include_str!("../../apps/orchestrator_theme.toml"),
    ),
];

/// A validated manifest and where it came from (file path or label).
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub origin: String,
    pub manifest: ModuleManifest,
}

/// Parse and validate one manifest document.
pub fn parse(source: &str, origin: impl Into<String>) -> Result<LoadedManifest, ManifestError> {
    let origin = origin.into();
    let manifest: ModuleManifest =
        toml::from_str(source).map_err(|source| ManifestError::Parse {
            origin: origin.clone(),
            source,
        })?;

    validate(&manifest, &origin)?;

    for key in manifest.extra.keys() {
        tracing::debug!("{}: preserving unrecognised key `{}`", origin, key);
    }
    if !manifest.hooks.is_empty() {
        tracing::debug!(
            "{}: {} hook callback(s) declared, inert",
            origin,
            manifest.hooks.callback_count()
        );
    }

    Ok(LoadedManifest { origin, manifest })
}

/// Check required scalar fields and fixture filters.
pub fn validate(manifest: &ModuleManifest, origin: &str) -> Result<(), ManifestError> {
    for field in ModuleManifest::REQUIRED_FIELDS {
        let missing = manifest
            .required_field(field)
            .map(|v| v.trim().is_empty())
            .unwrap_or(true);
        if missing {
            return Err(ManifestError::MissingField {
                origin: origin.to_string(),
                field,
            });
        }
    }

    for fixture in &manifest.fixtures {
        if fixture.filters.field != FixtureFilter::NAME_FIELD {
            return Err(ManifestError::UnsupportedFilter {
                origin: origin.to_string(),
                entity_kind: fixture.entity_kind.clone(),
                field: fixture.filters.field.clone(),
            });
        }
    }

    Ok(())
}

/// Load every `*.toml` manifest in `dir`, sorted by file name.
pub fn load_dir(dir: &Path) -> Result<Vec<LoadedManifest>, ManifestError> {
    let io_err = |source| ManifestError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut manifests = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;
        manifests.push(parse(&source, path.display().to_string())?);
    }

    tracing::info!("Loaded {} manifest(s) from {}", manifests.len(), dir.display());
    Ok(manifests)
}

/// The manifests shipped with the binary, in registration order.
pub fn bundled() -> Result<Vec<LoadedManifest>, ManifestError> {
    BUNDLED
        .iter()
        .map(|(file, source)| parse(source, format!("bundled:{}", file)))
        .collect()
}

/// Load from `dir` if given, otherwise the bundled set, and build the registry.
pub fn load_registry(dir: Option<&Path>) -> Result<ModuleRegistry, ManifestError> {
    let manifests = match dir {
        Some(dir) => load_dir(dir)?,
        None => bundled()?,
    };
    ModuleRegistry::new(manifests)
}
