// File: crates/calman_gcal/src/handlers.rs
use crate::logic::{
    create_calendar_event, get_formatted_events, get_free_intervals, AvailabilitySlot,
    CalendarEventsResponse, CheckLoginResponse, CreateEventRequest, CreateEventResponse,
    WindowQuery, NO_EVENTS_MESSAGE,
};
use crate::service::SharedCalendar;
use axum::{extract::State, response::Json};
use calman_common::error::{auth_error, config_error, CalmanError};
use calman_common::http::{ApiJson, ApiQuery};
use calman_common::logging::log_result;
use calman_config::{AppConfig, DEFAULT_CALENDAR_ID, DEFAULT_TIME_ZONE};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

// Shared state needed by the calendar handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    /// `None` until a calendar client has been resolved.
    pub calendar: Option<SharedCalendar>,
}

impl GcalState {
    pub fn new(config: Arc<AppConfig>, calendar: Option<SharedCalendar>) -> Self {
        Self { config, calendar }
    }

    fn calendar(&self) -> Result<&SharedCalendar, CalmanError> {
        self.calendar
            .as_ref()
            .ok_or_else(|| auth_error("Not logged in"))
    }

    fn calendar_id(&self) -> &str {
        self.config
            .gcal
            .as_ref()
            .map_or(DEFAULT_CALENDAR_ID, |g| g.calendar_id())
    }

    fn time_zone(&self) -> Result<Tz, CalmanError> {
        let name = self
            .config
            .gcal
            .as_ref()
            .map_or(DEFAULT_TIME_ZONE, |g| g.time_zone());
        name.parse::<Tz>()
            .map_err(|_| config_error(format!("Invalid configured time zone: {name}")))
    }
}

fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Reports whether a calendar client is available.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/check_login",
    responses(
        (status = 200, description = "Login state", body = CheckLoginResponse)
    ),
    tag = "Calendar"
))]
pub async fn check_login_handler(State(state): State<Arc<GcalState>>) -> Json<CheckLoginResponse> {
    Json(CheckLoginResponse {
        logged_in: state.calendar.is_some(),
    })
}

/// Handler to get the free intervals of a day or month.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availabilities",
    params(WindowQuery),
    responses(
        (status = 200, description = "Free intervals in the window", body = [AvailabilitySlot]),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Calendar backend failure")
    ),
    tag = "Calendar"
))]
pub async fn get_availabilities_handler(
    State(state): State<Arc<GcalState>>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<Json<Vec<AvailabilitySlot>>, CalmanError> {
    let calendar = state.calendar()?;
    let tz = state.time_zone()?;
    let window = query.resolve(&tz, today_in(&tz))?;

    let free = log_result(
        get_free_intervals(calendar, state.calendar_id(), &window, &tz).await,
        "Computed free intervals",
        "Error computing availability",
    )?;

    Ok(Json(free.iter().map(AvailabilitySlot::from).collect()))
}

/// Handler to list the events of a day or month.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar_events",
    params(WindowQuery),
    responses(
        (status = 200, description = "Formatted events, or a message when there are none", body = [crate::logic::FormattedEvent]),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Calendar backend failure")
    ),
    tag = "Calendar"
))]
pub async fn get_calendar_events_handler(
    State(state): State<Arc<GcalState>>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<Json<CalendarEventsResponse>, CalmanError> {
    let calendar = state.calendar()?;
    let tz = state.time_zone()?;
    let window = query.resolve(&tz, today_in(&tz))?;

    let events = log_result(
        get_formatted_events(calendar, state.calendar_id(), &window, &tz).await,
        "Fetched calendar events",
        "Error fetching calendar events",
    )?;

    if events.is_empty() {
        return Ok(Json(CalendarEventsResponse::Empty {
            message: NO_EVENTS_MESSAGE.to_string(),
        }));
    }
    Ok(Json(CalendarEventsResponse::Events(events)))
}

/// Handler to create a calendar event.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/create_event",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created", body = CreateEventResponse),
        (status = 400, description = "Missing or invalid fields, or a malformed body"),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Calendar backend failure")
    ),
    tag = "Calendar"
))]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>, CalmanError> {
    let calendar = state.calendar()?;

    let created = log_result(
        create_calendar_event(calendar, state.calendar_id(), payload).await,
        "Created calendar event",
        "Error creating event",
    )?;
    info!("Successfully created event: {:?}", created.event_id);

    Ok(Json(CreateEventResponse {
        message: "Event created successfully".to_string(),
        id: created.event_id,
    }))
}
