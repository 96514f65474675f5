//! Settings dependency.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;

/// Fixed application settings exposed to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Settings {
    /// Application name.
    pub app_name: String,
    /// Per-user item allowance.
    pub items_per_user: u32,
}

impl Settings {
    /// Snapshot the settings portion of the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_name: config.app_name.clone(),
            items_per_user: config.items_per_user,
        }
    }
}
