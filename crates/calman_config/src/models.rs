// --- File: crates/calman_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Calendar queried when `gcal.calendar_id` is not configured.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Time zone used for windows and output when `gcal.time_zone` is not configured.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GcalConfig {
    /// Path to the service account JSON key.
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
    /// IANA name, e.g. "America/New_York".
    pub time_zone: Option<String>,
}

impl GcalConfig {
    pub fn calendar_id(&self) -> &str {
        self.calendar_id.as_deref().unwrap_or(DEFAULT_CALENDAR_ID)
    }

    pub fn time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // Runtime flag, optional in config file, defaults to false
    #[serde(default)]
    pub use_gcal: bool,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
