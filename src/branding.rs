//! Site branding: overwrite the website settings singleton with fixed branding.
//!
//! The procedure connects to a site, loads the settings record, assigns the
//! branding fields, saves and commits in one transaction, and reports the
//! written values. Running it twice leaves the same state and prints the same
//! lines.

use std::fmt;

use thiserror::Error;

use crate::config::Site;
use crate::db::{Database, DbError};
use crate::models::{BrandingInput, SettingsRecord, WEBSITE_SETTINGS};

#[derive(Debug, Error)]
pub enum BrandingError {
    #[error("cannot reach site")]
    Connection(#[source] DbError),

    /// The store was reached but the settings record could not be read.
    #[error("failed to read settings from site store")]
    Store(#[source] DbError),

    #[error("settings record '{0}' not found")]
    NotFound(String),

    #[error("failed to save '{target}'")]
    Persistence {
        target: String,
        #[source]
        source: DbError,
    },
}

/// The record as persisted by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandingReport {
    pub record: SettingsRecord,
}

impl BrandingReport {
    /// Confirmation lines: a header followed by `field: value` pairs.
    pub fn lines(&self) -> Vec<String> {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            format!("✅ {} updated!", self.record.name),
            format!("   App Name: {}", value(&self.record.app_name)),
            format!("   Logo: {}", value(&self.record.app_logo)),
            format!("   Favicon: {}", value(&self.record.favicon)),
        ]
    }
}

impl fmt::Display for BrandingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Apply `input` to the settings record `target` through an open handle.
pub fn apply_branding(
    db: &Database,
    target: &str,
    input: &BrandingInput,
) -> Result<BrandingReport, BrandingError> {
    let mut record = db
        .get_settings(target)
        .map_err(|e| match e {
            DbError::Connection { .. } => BrandingError::Connection(e),
            e => BrandingError::Store(e),
        })?
        .ok_or_else(|| BrandingError::NotFound(target.to_string()))?;

    input.apply_to(&mut record);

    let record = db.save_settings(&record).map_err(|e| match e {
        DbError::NotFound { name, .. } => BrandingError::NotFound(name),
        source => BrandingError::Persistence {
            target: target.to_string(),
            source,
        },
    })?;

    tracing::info!(
        "Branding applied to '{}': app_name={:?}",
        record.name,
        record.app_name
    );
    Ok(BrandingReport { record })
}

/// Connect to `site`, brand its website settings, and release the connection.
pub fn run(site: &Site, input: &BrandingInput) -> Result<BrandingReport, BrandingError> {
    let db = Database::connect(&site.db_path()).map_err(BrandingError::Connection)?;
    apply_branding(&db, WEBSITE_SETTINGS, input)
}
