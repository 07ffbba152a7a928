use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FixtureDirective, HookRegistry};

/// A module's static declaration, consumed by the host at load time.
///
/// Required identity fields default to empty strings during deserialization so that
/// validation can report exactly which one is missing instead of a generic parse error.
/// See [`crate::manifest::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Unique identifier token, e.g. `orchestrator_hr`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license: String,
    /// Icon reference token (e.g. `octicon octicon-people`). Free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display color (e.g. `#27ae60`). Free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Scripts and styles included in the desk `<head>`.
    #[serde(default)]
    pub asset_includes: AssetIncludes,
    /// Scripts and styles included in the public website `<head>`.
    #[serde(default)]
    pub web_includes: AssetIncludes,
    #[serde(default)]
    pub fixtures: Vec<FixtureDirective>,
    /// Document types this module claims. Documentary only.
    #[serde(default)]
    pub owned_document_types: Vec<String>,
    #[serde(default, alias = "permission")]
    pub permissions: Vec<PermissionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_context: Option<WebsiteContext>,
    #[serde(default)]
    pub hooks: HookRegistry,
    /// Unrecognised top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ModuleManifest {
    /// Names of the required scalar fields, in declaration order.
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "name",
        "title",
        "publisher",
        "description",
        "version",
        "license",
    ];

    /// Value of a required scalar field by name.
    pub fn required_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "title" => Some(&self.title),
            "publisher" => Some(&self.publisher),
            "description" => Some(&self.description),
            "version" => Some(&self.version),
            "license" => Some(&self.license),
            _ => None,
        }
    }
}

/// Ordered lists of script and style paths. Order is load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIncludes {
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

impl AssetIncludes {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.styles.is_empty()
    }
}

/// Where an asset is included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssetScope {
    /// Desk (backend) pages.
    App,
    /// Public website pages.
    Web,
}

impl AssetScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Web => "web",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "app" => Some(Self::App),
            "web" => Some(Self::Web),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Script,
    Style,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "script" => Some(Self::Script),
            "style" => Some(Self::Style),
            _ => None,
        }
    }
}

/// A declarative access rule for a document type. Stored and served, never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub doctype: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub perm_level: u32,
    #[serde(default)]
    pub apply_user_permissions: bool,
    #[serde(default)]
    pub match_filters: Vec<MatchFilter>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub submit: bool,
    #[serde(default)]
    pub amend: bool,
    #[serde(default)]
    pub cancel: bool,
    #[serde(default)]
    pub export: bool,
    #[serde(default)]
    pub print: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub report: bool,
}

/// Restricts a permission rule to records whose `key` matches `value` (e.g. the current user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    pub key: String,
    pub value: String,
}

/// Website template context contributed by a theme module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_html: Option<String>,
    #[serde(default)]
    pub top_bar_items: Vec<serde_json::Value>,
    #[serde(default)]
    pub footer_items: Vec<serde_json::Value>,
}
