//! Desk boot payload, customised by the theme's branding.

use crate::config::SiteConfig;
use crate::models::{BootInfo, SettingsRecord};

/// App name shown before a site has been branded.
pub const DEFAULT_APP_NAME: &str = "Orchestrator";

/// Build the boot payload from the site's settings record (if any) and config.
pub fn boot_session(settings: Option<&SettingsRecord>, config: &SiteConfig) -> BootInfo {
    let app_name = settings
        .and_then(|s| s.app_name.clone())
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

    BootInfo {
        app_name,
        app_logo_url: settings.and_then(|s| s.app_logo.clone()),
        hide_footer_branding: config.hide_footer_branding,
        home_page: config.home_page.clone(),
    }
}
