//! Runtime feature flags.
//!
//! Compile-time features (`openapi`) are handled with `#[cfg(feature = ...)]`;
//! this module covers the flags read from configuration.

use calman_config::AppConfig;

/// A feature is on when its flag is set and its config section is present.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar feature is enabled at runtime.
pub fn is_gcal_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}
