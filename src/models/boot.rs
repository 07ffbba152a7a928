use serde::{Deserialize, Serialize};

/// Payload sent to the desk on every login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootInfo {
    pub app_name: String,
    pub app_logo_url: Option<String>,
    /// Hide the framework's own footer branding.
    pub hide_footer_branding: bool,
    /// Route the desk opens after login.
    pub home_page: String,
}
