// --- File: crates/calman_common/src/services.rs ---
//! Service abstractions for the upstream calendar.
//!
//! Handlers only see the [`CalendarService`] trait, so the Google client can be
//! swapped for an in-memory one in tests, and a missing client simply means
//! "not authenticated".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// One boundary of a calendar event as the feed reports it.
///
/// Timed events carry an instant; all-day events only carry a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

/// A raw event record from the calendar feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// "confirmed", "tentative" or "cancelled"
    pub status: Option<String>,
    pub organizer: Option<String>,
    pub creator: Option<String>,
    /// Whether the authenticated account created the event.
    pub created_by_me: Option<bool>,
}

/// Payload for inserting a timed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
}

/// Result of a calendar insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    pub status: String,
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List the events overlapping `[start_time, end_time]`, recurring events
    /// expanded into single instances, ordered by start time.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error>;

    /// Insert a timed event.
    fn insert_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}
