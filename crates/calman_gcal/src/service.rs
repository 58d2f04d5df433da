// --- File: crates/calman_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.

use calman_common::services::{
    BoxFuture, CalendarEntry, CalendarEventResult, CalendarService, EventTime, NewCalendarEvent,
};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::HubType;

/// Page size requested from the events list endpoint.
const PAGE_SIZE: i32 = 250;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
}

/// The calendar client handed to handlers. `None` in the state means nobody
/// is logged in.
pub type SharedCalendar = Arc<dyn CalendarService<Error = GcalServiceError>>;

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

/// Reads one boundary of a Google event, preferring the precise timestamp.
fn event_time(value: Option<&EventDateTime>) -> Option<EventTime> {
    let value = value?;
    match (value.date_time, value.date) {
        (Some(instant), _) => Some(EventTime::DateTime(instant)),
        (None, Some(date)) => Some(EventTime::Date(date)),
        (None, None) => None,
    }
}

/// Converts a Google event into a feed record. Events without usable
/// boundaries yield `None`.
pub(crate) fn entry_from_event(event: Event) -> Option<CalendarEntry> {
    let (Some(start), Some(end)) = (
        event_time(event.start.as_ref()),
        event_time(event.end.as_ref()),
    ) else {
        warn!("Skipping event {:?} without start/end", event.id);
        return None;
    };

    let creator = event.creator.as_ref();
    Some(CalendarEntry {
        id: event.id,
        start,
        end,
        summary: event.summary,
        description: event.description,
        location: event.location,
        status: event.status,
        organizer: event.organizer.and_then(|o| o.email),
        creator: creator.and_then(|c| c.email.clone()),
        created_by_me: creator.and_then(|c| c.self_),
    })
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Lists the events of `calendar_id` overlapping the range.
    ///
    /// Recurring events are expanded (`singleEvents=true`) and ordered by
    /// start time. All pages are followed.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut entries = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut request = calendar_hub
                    .events()
                    .list(&calendar_id)
                    .time_min(start_time)
                    .time_max(end_time)
                    .single_events(true) // Expand recurring events
                    .order_by("startTime")
                    .max_results(PAGE_SIZE);
                if let Some(token) = page_token.as_deref() {
                    request = request.page_token(token);
                }

                let (_, events_list) = request.doit().await?;

                entries.extend(
                    events_list
                        .items
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(entry_from_event),
                );

                match events_list.next_page_token {
                    Some(token) => {
                        debug!("Following events page token");
                        page_token = Some(token);
                    }
                    None => break,
                }
            }

            Ok(entries)
        })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                location: event.location,
                start: Some(EventDateTime {
                    date_time: Some(event.start),
                    time_zone: Some(event.time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end),
                    time_zone: Some(event.time_zone),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
