//! Host-side provisioning: register a module registry into a site and seed its fixtures.

use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::manifest::ModuleRegistry;
use crate::models::{FixtureOutcome, RegisteredModule};

/// What an install changed.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub modules: Vec<RegisteredModule>,
    /// One outcome per fixture directive, tagged with its module.
    pub fixtures: Vec<(String, FixtureOutcome)>,
}

impl InstallReport {
    pub fn inserted_count(&self) -> usize {
        self.fixtures.iter().map(|(_, o)| o.inserted.len()).sum()
    }

    pub fn existing_count(&self) -> usize {
        self.fixtures.iter().map(|(_, o)| o.existing.len()).sum()
    }
}

/// Register every module, then apply every fixture directive in order.
///
/// Registration is a single transaction. Fixture application is idempotent, so
/// an interrupted install can simply be rerun.
pub fn install(db: &Database, registry: &ModuleRegistry) -> DbResult<InstallReport> {
    let modules = db.register_modules(registry)?;
    tracing::info!("Registered {} module(s)", modules.len());

    let mut fixtures = Vec::new();
    for (module, directive) in registry.fixtures() {
        let outcome = db.apply_fixture(module, directive)?;
        tracing::debug!(
            "{}: {} {} inserted, {} already present",
            module,
            directive.entity_kind,
            outcome.inserted.len(),
            outcome.existing.len()
        );
        fixtures.push((module.to_string(), outcome));
    }

    let report = InstallReport { modules, fixtures };
    tracing::info!(
        "Fixtures applied: {} inserted, {} already present",
        report.inserted_count(),
        report.existing_count()
    );
    Ok(report)
}
