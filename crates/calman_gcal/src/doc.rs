// File: crates/calman_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers;
use crate::logic::{
    AvailabilitySlot, CheckLoginResponse, CreateEventRequest, CreateEventResponse,
    FormattedEvent, WindowSpan,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::check_login_handler,
        handlers::get_availabilities_handler,
        handlers::get_calendar_events_handler,
        handlers::create_event_handler
    ),
    components(
        schemas(
            AvailabilitySlot,
            CheckLoginResponse,
            CreateEventRequest,
            CreateEventResponse,
            FormattedEvent,
            WindowSpan
        )
    ),
    tags(
        (name = "Calendar", description = "Google Calendar availability and events")
    ),
    servers(
        (url = "/api", description = "Calendar API server")
    )
)]
pub struct GcalApiDoc;
