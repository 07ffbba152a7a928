use std::collections::HashMap;

use super::{LoadedManifest, ManifestError};
use crate::models::{FixtureDirective, ModuleManifest};

/// The validated set of manifests of a deployment, in declaration order.
///
/// Construction is all-or-nothing: a duplicate module name anywhere in the input
/// rejects the whole set.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<LoadedManifest>,
    by_name: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new(manifests: impl IntoIterator<Item = LoadedManifest>) -> Result<Self, ManifestError> {
        let mut modules: Vec<LoadedManifest> = Vec::new();
        let mut by_name = HashMap::new();

        for loaded in manifests {
            let name = loaded.manifest.name.clone();
            if let Some(&index) = by_name.get(&name) {
                let first: &LoadedManifest = &modules[index];
                return Err(ManifestError::DuplicateName {
                    name,
                    first: first.origin.clone(),
                    second: loaded.origin,
                });
            }
            by_name.insert(name, modules.len());
            modules.push(loaded);
        }

        Ok(Self { modules, by_name })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleManifest> {
        self.by_name.get(name).map(|&i| &self.modules[i].manifest)
    }

    pub fn origin(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|&i| self.modules[i].origin.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleManifest> {
        self.modules.iter().map(|m| &m.manifest)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|m| m.name.as_str()).collect()
    }

    /// `(module, document type)` pairs across all modules.
    pub fn document_types(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|m| {
                m.owned_document_types
                    .iter()
                    .map(move |d| (m.name.as_str(), d.as_str()))
            })
            .collect()
    }

    /// `(module, directive)` pairs across all modules, in application order.
    pub fn fixtures(&self) -> Vec<(&str, &FixtureDirective)> {
        self.iter()
            .flat_map(|m| m.fixtures.iter().map(move |f| (m.name.as_str(), f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse;

    fn manifest(name: &str, doctypes: &[&str]) -> String {
        format!(
            r#"
            name = "{name}"
            title = "Title"
            publisher = "Orchestrator Team"
            description = "Description"
            version = "0.1.0"
            license = "Proprietary"
            owned_document_types = [{}]
            "#,
            doctypes
                .iter()
                .map(|d| format!("\"{}\"", d))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    #[test]
    fn rejects_duplicate_names_before_registering_any() {
        let first = parse(&manifest("orchestrator_hr", &["Employee", "Department"]), "a.toml").unwrap();
        let second = parse(&manifest("orchestrator_hr", &[]), "b.toml").unwrap();

        let err = ModuleRegistry::new(vec![first, second]).unwrap_err();

        match err {
            ManifestError::DuplicateName { name, first, second } => {
                assert_eq!(name, "orchestrator_hr");
                assert_eq!(first, "a.toml");
                assert_eq!(second, "b.toml");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn keeps_declaration_order() {
        let registry = ModuleRegistry::new(vec![
            parse(&manifest("zeta", &[]), "z").unwrap(),
            parse(&manifest("alpha", &[]), "a").unwrap(),
        ])
        .unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert_eq!(registry.origin("alpha"), Some("a"));
    }

    #[test]
    fn lists_document_types_per_module() {
        let registry = ModuleRegistry::new(vec![
            parse(&manifest("orchestrator_hr", &["Employee", "Department"]), "hr").unwrap(),
            parse(&manifest("orchestrator_docs", &["Document"]), "docs").unwrap(),
        ])
        .unwrap();

        assert_eq!(
            registry.document_types(),
            vec![
                ("orchestrator_hr", "Employee"),
                ("orchestrator_hr", "Department"),
                ("orchestrator_docs", "Document"),
            ]
        );
    }
}
