// --- File: crates/calman_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature flags
pub mod http; // Axum response conversion
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

pub use error::{
    auth_error, config_error, external_service_error, validation_error, CalmanError,
    HttpStatusCode,
};

pub use http::{ApiJson, ApiQuery};

pub use features::{is_feature_enabled, is_gcal_enabled};
