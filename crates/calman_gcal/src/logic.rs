// --- File: crates/calman_gcal/src/logic.rs ---
use crate::service::{GcalServiceError, SharedCalendar};
use calman_common::error::{external_service_error, validation_error, CalmanError};
use calman_common::services::{
    CalendarEntry, CalendarEventResult, CalendarService, EventTime, NewCalendarEvent,
};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum GcalError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: String, end: String },
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Missing required fields: summary, start, end.")]
    MissingFields,
    #[error("Calendar service error: {0}")]
    ServiceError(#[from] GcalServiceError),
}

impl From<GcalError> for CalmanError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::ServiceError(e) => external_service_error("Google Calendar", e),
            other => validation_error(other),
        }
    }
}

// --- Intervals ---

/// A time range with an inclusive start and end, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

/// The query bound: one calendar day or one calendar month.
pub type Window = TimeInterval;
/// A range blocked by an existing calendar entry.
pub type BusyInterval = TimeInterval;
/// A gap in the busy set.
pub type FreeInterval = TimeInterval;

impl TimeInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, GcalError> {
        if start > end {
            return Err(GcalError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }
}

/// Computes the free intervals of `window` that no busy interval covers.
///
/// Busy intervals may be unsorted, overlapping or nested. They are not clipped
/// to the window: one that starts before `window.start` still moves the
/// cursor, so it can swallow the beginning of the window.
pub fn compute_free_intervals(window: &Window, busy: &[BusyInterval]) -> Vec<FreeInterval> {
    let mut sorted = busy.to_vec();
    // stable, so equal starts keep their input order
    sorted.sort_by_key(|interval| interval.start);

    let mut free = Vec::new();
    let mut cursor = window.start;
    for interval in &sorted {
        if cursor < interval.start {
            free.push(TimeInterval {
                start: cursor,
                end: interval.start,
            });
        }
        // max, not assignment: an engulfed interval must not move the cursor back
        cursor = cursor.max(interval.end);
    }
    if cursor < window.end {
        free.push(TimeInterval {
            start: cursor,
            end: window.end,
        });
    }
    free
}

// --- Windows ---

/// Whether a window covers one day or one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WindowSpan {
    #[default]
    Day,
    Month,
}

/// Query parameters selecting a window. Missing parts default to today.
///
/// A date part that is not an integer counts as missing.
#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct WindowQuery {
    /// Day of month, ignored for `span=month`
    #[serde(default, deserialize_with = "lenient_number")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<i32>,
    #[serde(default)]
    pub span: WindowSpan,
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

impl WindowQuery {
    /// Builds the window in `tz`, filling missing parts from `today`.
    pub fn resolve(&self, tz: &Tz, today: NaiveDate) -> Result<Window, GcalError> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        match self.span {
            WindowSpan::Day => day_window(tz, year, month, self.day.unwrap_or_else(|| today.day())),
            WindowSpan::Month => month_window(tz, year, month),
        }
    }
}

/// Reads a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap move forward by the usual one-hour shift.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

fn invalid_date(year: i32, month: u32, day: u32) -> GcalError {
    GcalError::InvalidDate(format!("{year:04}-{month:02}-{day:02}"))
}

/// `[first 00:00:00, last 23:59:59]` in local time.
fn window_between(tz: &Tz, first: NaiveDate, last: NaiveDate) -> Result<Window, GcalError> {
    let start = first.and_time(NaiveTime::MIN);
    let end = last
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| GcalError::InvalidDate(last.to_string()))?;
    TimeInterval::new(localize(tz, start), localize(tz, end))
}

/// The window covering one calendar day in `tz`.
pub fn day_window(tz: &Tz, year: i32, month: u32, day: u32) -> Result<Window, GcalError> {
    let date =
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(year, month, day))?;
    window_between(tz, date, date)
}

/// The window covering one calendar month in `tz`, ending one second before
/// the next month starts.
pub fn month_window(tz: &Tz, year: i32, month: u32) -> Result<Window, GcalError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid_date(year, month, 1))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| invalid_date(year, month, 1))?;
    window_between(tz, first, last)
}

// --- Busy intervals from calendar entries ---

/// Places an event boundary on the timeline of `tz`.
///
/// All-day boundaries start at local midnight.
pub fn event_time_in(tz: &Tz, time: &EventTime) -> DateTime<Tz> {
    match time {
        EventTime::DateTime(instant) => instant.with_timezone(tz),
        EventTime::Date(date) => localize(tz, date.and_time(NaiveTime::MIN)),
    }
}

/// Derives the busy intervals of a feed. Cancelled entries are not busy;
/// entries ending before they start are dropped.
pub fn busy_intervals(entries: &[CalendarEntry], tz: &Tz) -> Vec<BusyInterval> {
    entries
        .iter()
        .filter(|entry| entry.status.as_deref() != Some("cancelled"))
        .filter_map(|entry| {
            let start = event_time_in(tz, &entry.start);
            let end = event_time_in(tz, &entry.end);
            TimeInterval::new(start, end)
                .map_err(|e| warn!("Skipping event {:?}: {}", entry.id, e))
                .ok()
        })
        .collect()
}

// --- Event timestamps ---

pub fn parse_time_zone(name: &str) -> Result<Tz, GcalError> {
    name.parse::<Tz>()
        .map_err(|_| GcalError::UnknownTimeZone(name.to_string()))
}

/// Parses an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM[:SS]` read as
/// local time in `tz`.
pub fn parse_event_timestamp(value: &str, tz: &Tz) -> Result<DateTime<Utc>, GcalError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(localize(tz, naive).with_timezone(&Utc));
        }
    }
    Err(GcalError::TimeParseError(format!("Invalid timestamp: {value}")))
}

// --- Data Structures ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilitySlot {
    #[cfg_attr(feature = "openapi", schema(example = "2024-03-01T00:00:00-05:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "2024-03-01T09:00:00-05:00"))]
    pub end: String,
}

impl From<&FreeInterval> for AvailabilitySlot {
    fn from(interval: &FreeInterval) -> Self {
        Self {
            start: interval.start.to_rfc3339(),
            end: interval.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FormattedEvent {
    pub id: Option<String>,
    /// RFC 3339, or `YYYY-MM-DD` for all-day events
    pub start: String,
    pub end: String,
    pub organizer: Option<String>,
    pub creator: Option<String>,
    pub am_i_organizing: Option<bool>,
    pub location: String,
    pub status: String,
    pub summary: String,
    pub description: String,
}

fn format_event_time(time: &EventTime, tz: &Tz) -> String {
    match time {
        EventTime::DateTime(instant) => instant.with_timezone(tz).to_rfc3339(),
        EventTime::Date(date) => date.format("%Y-%m-%d").to_string(),
    }
}

impl FormattedEvent {
    pub fn from_entry(entry: &CalendarEntry, tz: &Tz) -> Self {
        Self {
            id: entry.id.clone(),
            start: format_event_time(&entry.start, tz),
            end: format_event_time(&entry.end, tz),
            organizer: entry.organizer.clone(),
            creator: entry.creator.clone(),
            am_i_organizing: entry.created_by_me,
            location: entry
                .location
                .clone()
                .unwrap_or_else(|| "No location specified".to_string()),
            status: entry.status.clone().unwrap_or_else(|| "unknown".to_string()),
            summary: entry
                .summary
                .clone()
                .unwrap_or_else(|| "No summary".to_string()),
            description: entry
                .description
                .clone()
                .unwrap_or_else(|| "No description".to_string()),
        }
    }
}

pub const NO_EVENTS_MESSAGE: &str = "No events found for the specified date.";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum CalendarEventsResponse {
    Events(Vec<FormattedEvent>),
    Empty { message: String },
}

#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Dentist"))]
    pub summary: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2024-03-01T09:00:00"))]
    pub start: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2024-03-01T09:30:00"))]
    pub end: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// IANA zone for naive `start`/`end`; defaults to UTC
    #[serde(rename = "timeZone")]
    #[cfg_attr(feature = "openapi", schema(example = "America/New_York"))]
    pub time_zone: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateEventRequest {
    /// Validates the request and resolves its timestamps.
    pub fn into_new_event(self) -> Result<NewCalendarEvent, GcalError> {
        let (summary, start, end) = match (
            non_blank(self.summary),
            non_blank(self.start),
            non_blank(self.end),
        ) {
            (Some(summary), Some(start), Some(end)) => (summary, start, end),
            _ => return Err(GcalError::MissingFields),
        };

        let time_zone = non_blank(self.time_zone).unwrap_or_else(|| "UTC".to_string());
        let tz = parse_time_zone(&time_zone)?;
        let start = parse_event_timestamp(&start, &tz)?;
        let end = parse_event_timestamp(&end, &tz)?;
        if start > end {
            return Err(GcalError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        Ok(NewCalendarEvent {
            summary,
            description: non_blank(self.description),
            location: non_blank(self.location),
            start,
            end,
            time_zone,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventResponse {
    pub message: String,
    pub id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckLoginResponse {
    pub logged_in: bool,
}

// --- Calendar-backed operations ---

async fn list_window(
    calendar: &SharedCalendar,
    calendar_id: &str,
    window: &Window,
) -> Result<Vec<CalendarEntry>, GcalError> {
    debug!(
        "Fetching events from {} to {}",
        window.start.to_rfc3339(),
        window.end.to_rfc3339()
    );
    let entries = calendar
        .list_events(
            calendar_id,
            window.start.with_timezone(&Utc),
            window.end.with_timezone(&Utc),
        )
        .await?;
    Ok(entries)
}

/// Fetches the window's events and returns its free intervals.
pub async fn get_free_intervals(
    calendar: &SharedCalendar,
    calendar_id: &str,
    window: &Window,
    tz: &Tz,
) -> Result<Vec<FreeInterval>, GcalError> {
    let entries = list_window(calendar, calendar_id, window).await?;
    let busy = busy_intervals(&entries, tz);
    let free = compute_free_intervals(window, &busy);
    debug!(
        "{} busy intervals -> {} free intervals",
        busy.len(),
        free.len()
    );
    Ok(free)
}

/// Fetches the window's events formatted for display.
pub async fn get_formatted_events(
    calendar: &SharedCalendar,
    calendar_id: &str,
    window: &Window,
    tz: &Tz,
) -> Result<Vec<FormattedEvent>, GcalError> {
    let entries = list_window(calendar, calendar_id, window).await?;
    info!("Retrieved {} events.", entries.len());
    Ok(entries
        .iter()
        .map(|entry| FormattedEvent::from_entry(entry, tz))
        .collect())
}

/// Validates and inserts a new event.
pub async fn create_calendar_event(
    calendar: &SharedCalendar,
    calendar_id: &str,
    request: CreateEventRequest,
) -> Result<CalendarEventResult, GcalError> {
    let event = request.into_new_event()?;
    debug!("Attempting to create event: {:?}", event);
    let result = calendar.insert_event(calendar_id, event).await?;
    Ok(result)
}
