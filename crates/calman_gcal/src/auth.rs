// File: crates/calman_gcal/src/auth.rs
use calman_config::{AppConfig, GcalConfig};
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use std::{error::Error, path::Path, sync::Arc};
use calman_common::logging::log_error;
use tracing::info;

use crate::service::{GoogleCalendarService, SharedCalendar};

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in GcalConfig")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}

/// Builds the calendar client the handlers run against.
///
/// Returns `None` when Google Calendar is disabled or the service account
/// cannot be loaded; the API then answers "Not logged in".
pub async fn resolve_calendar_client(config: &AppConfig) -> Option<SharedCalendar> {
    if !calman_common::is_gcal_enabled(config) {
        info!("Google Calendar is disabled; calendar endpoints will report not logged in.");
        return None;
    }
    let gcal_config = config.gcal.as_ref()?;

    match create_calendar_hub(gcal_config).await {
        Ok(hub) => {
            info!("Google Calendar client ready.");
            let service: SharedCalendar = Arc::new(GoogleCalendarService::new(Arc::new(hub)));
            Some(service)
        }
        Err(e) => {
            log_error(e, "Could not create Google Calendar client");
            None
        }
    }
}
