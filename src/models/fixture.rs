use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seed directive: ensure the records of `entity_kind` selected by `filters` exist.
///
/// Applying a directive is idempotent. Records that already exist are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDirective {
    /// Kind of record to seed (e.g. `Custom Role`).
    pub entity_kind: String,
    pub filters: FixtureFilter,
}

impl FixtureDirective {
    /// Shorthand for a `name in [...]` directive.
    pub fn names_in(entity_kind: impl Into<String>, names: &[&str]) -> Self {
        Self {
            entity_kind: entity_kind.into(),
            filters: FixtureFilter {
                field: FixtureFilter::NAME_FIELD.to_string(),
                predicate: FilterPredicate::In,
                values: names.iter().map(|n| n.to_string()).collect(),
            },
        }
    }
}

/// Selection predicate of a fixture directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFilter {
    pub field: String,
    pub predicate: FilterPredicate,
    #[serde(default)]
    pub values: Vec<String>,
}

impl FixtureFilter {
    /// The only field fixtures can select on.
    pub const NAME_FIELD: &'static str = "name";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterPredicate {
    /// Field value is a member of the given set.
    In,
}

/// A record that exists in the site store because a fixture asked for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub entity_kind: String,
    pub name: String,
    /// Module whose fixture first seeded the record.
    pub source_module: String,
    pub created_at: DateTime<Utc>,
}

/// Result of applying one fixture directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureOutcome {
    pub entity_kind: String,
    /// Names that were created by this application, in directive order.
    pub inserted: Vec<String>,
    /// Names that were already present.
    pub existing: Vec<String>,
}
