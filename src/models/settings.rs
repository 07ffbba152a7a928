use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed identifier of the website settings singleton.
pub const WEBSITE_SETTINGS: &str = "Website Settings";

/// The singleton branding record of a site.
///
/// Only the branding fields are modelled; the record is created by `init` and
/// overwritten by the branding procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Well-known identifier, normally [`WEBSITE_SETTINGS`].
    pub name: String,
    pub app_name: Option<String>,
    pub app_logo: Option<String>,
    pub favicon: Option<String>,
    pub brand_html: Option<String>,
    pub hide_footer_signup: bool,
    pub updated_at: DateTime<Utc>,
}

/// Field values written by the branding procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingInput {
    pub app_name: String,
    pub app_logo: String,
    pub favicon: String,
    pub brand_html: String,
    pub hide_footer_signup: bool,
}

impl Default for BrandingInput {
    /// Chateau Orchestrator branding served by the theme module.
    fn default() -> Self {
        Self {
            app_name: "Chateau Orchestrator".to_string(),
            app_logo: "/assets/orchestrator_theme/images/logo.png".to_string(),
            favicon: "/assets/orchestrator_theme/images/favicon.png".to_string(),
            brand_html: "Chateau Orchestrator".to_string(),
            hide_footer_signup: true,
        }
    }
}

impl BrandingInput {
    /// Copy the branding fields onto a loaded record.
    pub fn apply_to(&self, record: &mut SettingsRecord) {
        record.app_name = Some(self.app_name.clone());
        record.app_logo = Some(self.app_logo.clone());
        record.favicon = Some(self.favicon.clone());
        record.brand_html = Some(self.brand_html.clone());
        record.hide_footer_signup = self.hide_footer_signup;
    }
}
