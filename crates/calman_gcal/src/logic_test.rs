#[cfg(test)]
mod tests {
    use crate::logic::{
        busy_intervals, compute_free_intervals, day_window, localize, month_window,
        parse_event_timestamp, AvailabilitySlot, BusyInterval, CreateEventRequest, FormattedEvent,
        GcalError, TimeInterval, WindowQuery, WindowSpan,
    };
    use calman_common::error::{CalmanError, HttpStatusCode};
    use calman_common::services::{CalendarEntry, EventTime};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    const TZ: Tz = Tz::America__New_York;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Tz> {
        TZ.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn busy(start: DateTime<Tz>, end: DateTime<Tz>) -> BusyInterval {
        TimeInterval::new(start, end).unwrap()
    }

    fn spans(free: &[TimeInterval]) -> Vec<(DateTime<Tz>, DateTime<Tz>)> {
        free.iter().map(|i| (i.start(), i.end())).collect()
    }

    fn timed_entry(id: &str, start: DateTime<Tz>, end: DateTime<Tz>) -> CalendarEntry {
        CalendarEntry {
            id: Some(id.to_string()),
            start: EventTime::DateTime(start.with_timezone(&Utc)),
            end: EventTime::DateTime(end.with_timezone(&Utc)),
            summary: Some(id.to_string()),
            description: None,
            location: None,
            status: Some("confirmed".to_string()),
            organizer: None,
            creator: None,
            created_by_me: None,
        }
    }

    // --- compute_free_intervals ---

    #[test]
    fn test_no_busy_intervals_returns_whole_window() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let free = compute_free_intervals(&window, &[]);
        assert_eq!(spans(&free), vec![(window.start(), window.end())]);
    }

    #[test]
    fn test_busy_interval_covering_window_leaves_nothing() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let free = compute_free_intervals(&window, &[busy(window.start(), window.end())]);
        assert!(free.is_empty());
    }

    #[test]
    fn test_single_busy_interval_splits_the_day() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let free = compute_free_intervals(&window, &[busy(at(9, 0, 0), at(9, 30, 0))]);

        let slots: Vec<AvailabilitySlot> = free.iter().map(AvailabilitySlot::from).collect();
        assert_eq!(
            slots,
            vec![
                AvailabilitySlot {
                    start: "2024-03-01T00:00:00-05:00".to_string(),
                    end: "2024-03-01T09:00:00-05:00".to_string(),
                },
                AvailabilitySlot {
                    start: "2024-03-01T09:30:00-05:00".to_string(),
                    end: "2024-03-01T23:59:59-05:00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_overlapping_busy_intervals_merge() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let busy_set = [busy(at(9, 0, 0), at(10, 0, 0)), busy(at(9, 30, 0), at(11, 0, 0))];
        let free = compute_free_intervals(&window, &busy_set);
        assert_eq!(
            spans(&free),
            vec![(at(0, 0, 0), at(9, 0, 0)), (at(11, 0, 0), at(23, 59, 59))]
        );
    }

    #[test]
    fn test_adjacent_busy_intervals_leave_no_gap() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let busy_set = [busy(at(9, 0, 0), at(10, 0, 0)), busy(at(10, 0, 0), at(11, 0, 0))];
        let free = compute_free_intervals(&window, &busy_set);
        assert_eq!(
            spans(&free),
            vec![(at(0, 0, 0), at(9, 0, 0)), (at(11, 0, 0), at(23, 59, 59))]
        );
    }

    #[test]
    fn test_nested_busy_interval_does_not_move_cursor_back() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let busy_set = [busy(at(9, 0, 0), at(12, 0, 0)), busy(at(10, 0, 0), at(10, 30, 0))];
        let free = compute_free_intervals(&window, &busy_set);
        assert_eq!(
            spans(&free),
            vec![(at(0, 0, 0), at(9, 0, 0)), (at(12, 0, 0), at(23, 59, 59))]
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let sorted = [
            busy(at(8, 0, 0), at(9, 0, 0)),
            busy(at(13, 0, 0), at(14, 0, 0)),
            busy(at(17, 0, 0), at(18, 30, 0)),
        ];
        let shuffled = [sorted[2], sorted[0], sorted[1]];
        assert_eq!(
            compute_free_intervals(&window, &sorted),
            compute_free_intervals(&window, &shuffled)
        );
    }

    #[test]
    fn test_interval_starting_before_window_is_not_clipped() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let early = busy(
            TZ.with_ymd_and_hms(2024, 2, 29, 22, 0, 0).unwrap(),
            at(1, 0, 0),
        );
        let free = compute_free_intervals(&window, &[early]);
        assert_eq!(spans(&free), vec![(at(1, 0, 0), at(23, 59, 59))]);
    }

    #[test]
    fn test_interval_past_window_end_swallows_tail() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let late = busy(
            at(22, 0, 0),
            TZ.with_ymd_and_hms(2024, 3, 2, 2, 0, 0).unwrap(),
        );
        let free = compute_free_intervals(&window, &[late]);
        assert_eq!(spans(&free), vec![(at(0, 0, 0), at(22, 0, 0))]);
    }

    #[test]
    fn test_interval_after_window_still_emits_gap() {
        // Out-of-window intervals are not clipped, so the gap runs up to them.
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        let next_day = TZ.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        let after = busy(next_day, TZ.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap());
        let free = compute_free_intervals(&window, &[after]);
        assert_eq!(spans(&free), vec![(at(0, 0, 0), next_day)]);
    }

    #[test]
    fn test_time_interval_rejects_reversed_bounds() {
        let result = TimeInterval::new(at(10, 0, 0), at(9, 0, 0));
        assert!(matches!(result, Err(GcalError::InvalidInterval { .. })));
        assert!(TimeInterval::new(at(9, 0, 0), at(9, 0, 0)).is_ok());
    }

    // --- windows ---

    #[test]
    fn test_day_window_bounds() {
        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        assert_eq!(window.start(), at(0, 0, 0));
        assert_eq!(window.end(), at(23, 59, 59));
    }

    #[test]
    fn test_month_window_december_rolls_over() {
        let window = month_window(&TZ, 2023, 12).unwrap();
        assert_eq!(window.start(), TZ.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end(), TZ.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_month_window_leap_february() {
        let window = month_window(&TZ, 2024, 2).unwrap();
        assert_eq!(window.end(), TZ.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());

        let window = month_window(&TZ, 2023, 2).unwrap();
        assert_eq!(window.end(), TZ.with_ymd_and_hms(2023, 2, 28, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        assert!(matches!(day_window(&TZ, 2024, 4, 31), Err(GcalError::InvalidDate(_))));
        assert!(matches!(day_window(&TZ, 2023, 2, 29), Err(GcalError::InvalidDate(_))));
        assert!(matches!(month_window(&TZ, 2024, 13), Err(GcalError::InvalidDate(_))));
        assert!(matches!(month_window(&TZ, 2024, 0), Err(GcalError::InvalidDate(_))));
    }

    #[test]
    fn test_invalid_date_maps_to_bad_request() {
        let err: CalmanError = day_window(&TZ, 2024, 4, 31).unwrap_err().into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_window_query_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let window = WindowQuery::default().resolve(&TZ, today).unwrap();
        assert_eq!(window, day_window(&TZ, 2024, 3, 1).unwrap());

        let query = WindowQuery {
            month: Some(2),
            span: WindowSpan::Month,
            ..Default::default()
        };
        let window = query.resolve(&TZ, today).unwrap();
        assert_eq!(window, month_window(&TZ, 2024, 2).unwrap());
    }

    #[test]
    fn test_window_span_deserializes_lowercase() {
        let span: WindowSpan = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(span, WindowSpan::Month);
        assert_eq!(WindowSpan::default(), WindowSpan::Day);
    }

    #[test]
    fn test_window_query_treats_non_numeric_parts_as_missing() {
        let query: WindowQuery =
            serde_json::from_str(r#"{"day":"abc","month":" 2 ","year":"20x4"}"#).unwrap();
        assert_eq!(query.day, None);
        assert_eq!(query.month, Some(2));
        assert_eq!(query.year, None);

        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let window = query.resolve(&TZ, today).unwrap();
        assert_eq!(window, day_window(&TZ, 2024, 2, 5).unwrap());
    }

    #[test]
    fn test_localize_dst_transitions() {
        // 2024-03-10 02:30 does not exist in New York
        let gap = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(localize(&TZ, gap).to_rfc3339(), "2024-03-10T03:30:00-04:00");

        // 2024-11-03 01:30 happens twice; take the first
        let ambiguous = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert_eq!(
            localize(&TZ, ambiguous).to_rfc3339(),
            "2024-11-03T01:30:00-04:00"
        );
    }

    // --- busy intervals from entries ---

    #[test]
    fn test_all_day_event_blocks_from_local_midnight() {
        let mut entry = timed_entry("offsite", at(0, 0, 0), at(0, 0, 0));
        entry.start = EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        entry.end = EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

        let busy_set = busy_intervals(&[entry], &TZ);
        assert_eq!(busy_set.len(), 1);
        assert_eq!(busy_set[0].start(), at(0, 0, 0));

        let window = day_window(&TZ, 2024, 3, 1).unwrap();
        assert!(compute_free_intervals(&window, &busy_set).is_empty());
    }

    #[test]
    fn test_cancelled_and_reversed_entries_are_not_busy() {
        let mut cancelled = timed_entry("cancelled", at(9, 0, 0), at(10, 0, 0));
        cancelled.status = Some("cancelled".to_string());
        let reversed = timed_entry("reversed", at(12, 0, 0), at(11, 0, 0));
        let kept = timed_entry("kept", at(14, 0, 0), at(15, 0, 0));

        let busy_set = busy_intervals(&[cancelled, reversed, kept], &TZ);
        assert_eq!(spans(&busy_set), vec![(at(14, 0, 0), at(15, 0, 0))]);
    }

    #[test]
    fn test_formatted_event_defaults() {
        let mut entry = timed_entry("e1", at(9, 0, 0), at(9, 30, 0));
        entry.summary = None;
        entry.status = None;
        entry.created_by_me = Some(true);

        let formatted = FormattedEvent::from_entry(&entry, &TZ);
        assert_eq!(formatted.start, "2024-03-01T09:00:00-05:00");
        assert_eq!(formatted.location, "No location specified");
        assert_eq!(formatted.status, "unknown");
        assert_eq!(formatted.summary, "No summary");
        assert_eq!(formatted.description, "No description");
        assert_eq!(formatted.am_i_organizing, Some(true));

        entry.start = EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let formatted = FormattedEvent::from_entry(&entry, &TZ);
        assert_eq!(formatted.start, "2024-03-01");
    }

    // --- create_event input ---

    #[test]
    fn test_parse_event_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap();
        assert_eq!(parse_event_timestamp("2024-03-01T14:00:00Z", &TZ).unwrap(), expected);
        assert_eq!(parse_event_timestamp("2024-03-01T09:00:00-05:00", &Tz::UTC).unwrap(), expected);
        assert_eq!(parse_event_timestamp("2024-03-01T09:00:00", &TZ).unwrap(), expected);
        assert_eq!(parse_event_timestamp("2024-03-01T09:00", &TZ).unwrap(), expected);
        assert!(matches!(
            parse_event_timestamp("tomorrow at nine", &TZ),
            Err(GcalError::TimeParseError(_))
        ));
    }

    fn request(summary: &str, start: &str, end: &str) -> CreateEventRequest {
        CreateEventRequest {
            summary: Some(summary.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_request_requires_fields() {
        let missing = CreateEventRequest {
            summary: Some("Dentist".to_string()),
            start: Some("2024-03-01T09:00:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(missing.into_new_event(), Err(GcalError::MissingFields)));

        let blank = request("   ", "2024-03-01T09:00:00", "2024-03-01T09:30:00");
        let err = blank.into_new_event().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: summary, start, end.");
    }

    #[test]
    fn test_create_request_resolves_time_zone() {
        let mut req = request("Dentist", "2024-03-01T09:00:00", "2024-03-01T09:30:00");
        req.time_zone = Some("America/New_York".to_string());
        req.location = Some(" ".to_string());

        let event = req.into_new_event().unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap());
        assert_eq!(event.time_zone, "America/New_York");
        assert_eq!(event.location, None);

        let utc_default = request("Dentist", "2024-03-01T09:00:00", "2024-03-01T09:30:00")
            .into_new_event()
            .unwrap();
        assert_eq!(utc_default.time_zone, "UTC");
        assert_eq!(utc_default.start, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_create_request_rejects_bad_input() {
        let mut unknown_tz = request("Dentist", "2024-03-01T09:00:00", "2024-03-01T09:30:00");
        unknown_tz.time_zone = Some("Mars/Olympus_Mons".to_string());
        assert!(matches!(
            unknown_tz.into_new_event(),
            Err(GcalError::UnknownTimeZone(_))
        ));

        let reversed = request("Dentist", "2024-03-01T10:00:00Z", "2024-03-01T09:00:00Z");
        let err: CalmanError = reversed.into_new_event().unwrap_err().into();
        assert_eq!(err.status_code(), 400);
    }
}
