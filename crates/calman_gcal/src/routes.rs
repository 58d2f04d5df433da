// --- File: crates/calman_gcal/src/routes.rs ---

use crate::handlers::{
    check_login_handler, create_event_handler, get_availabilities_handler,
    get_calendar_events_handler, GcalState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all calendar routes, relative to `/api`.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/check_login", get(check_login_handler))
        .route("/availabilities", get(get_availabilities_handler))
        .route("/calendar_events", get(get_calendar_events_handler))
        .route("/create_event", post(create_event_handler))
        .with_state(state)
}
