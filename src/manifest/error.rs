use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading manifests. All of them are fatal: nothing is registered.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{origin}: missing required field `{field}`")]
    MissingField { origin: String, field: &'static str },

    #[error("duplicate module name `{name}` declared by {first} and {second}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("{origin}: fixture for `{entity_kind}` filters on unsupported field `{field}`")]
    UnsupportedFilter {
        origin: String,
        entity_kind: String,
        field: String,
    },

    #[error("{origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
