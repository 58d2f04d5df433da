#[cfg(test)]
mod tests {
    use crate::logic::{compute_free_intervals, day_window, BusyInterval, TimeInterval, Window};
    use chrono::Duration;
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn window() -> Window {
        day_window(&Tz::Europe__Zurich, 2025, 5, 5).unwrap()
    }

    // Busy intervals as (offset, length) in minutes from window start; some
    // start before the window or run past its end.
    fn create_busy_intervals(base: &Window, raw: &[(i64, i64)]) -> Vec<BusyInterval> {
        raw.iter()
            .map(|&(offset, length)| {
                let start = base.start() + Duration::minutes(offset);
                TimeInterval::new(start, start + Duration::minutes(length)).unwrap()
            })
            .collect()
    }

    fn busy_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((-120i64..1560, 0i64..240), 0..12)
    }

    proptest! {
        #[test]
        fn test_free_intervals_are_ordered_and_disjoint(raw in busy_strategy()) {
            let window = window();
            let busy = create_busy_intervals(&window, &raw);
            let free = compute_free_intervals(&window, &busy);

            for interval in &free {
                prop_assert!(interval.start() < interval.end());
            }
            for pair in free.windows(2) {
                prop_assert!(pair[0].end() <= pair[1].start());
            }
        }

        #[test]
        fn test_free_intervals_avoid_busy_time(raw in busy_strategy()) {
            let window = window();
            let busy = create_busy_intervals(&window, &raw);
            let free = compute_free_intervals(&window, &busy);

            for f in &free {
                for b in &busy {
                    let overlaps = f.start() < b.end() && b.start() < f.end();
                    prop_assert!(!overlaps, "free {:?} overlaps busy {:?}", f, b);
                }
            }
        }

        #[test]
        fn test_first_free_interval_starts_at_window_start(raw in busy_strategy()) {
            let window = window();
            let busy = create_busy_intervals(&window, &raw);
            let free = compute_free_intervals(&window, &busy);

            for f in &free {
                prop_assert!(f.start() >= window.start());
            }
            let blocked_at_start = busy.iter().any(|b| b.start() <= window.start());
            if !blocked_at_start {
                prop_assert_eq!(free.first().map(|f| f.start()), Some(window.start()));
            }
        }

        #[test]
        fn test_permutation_invariance(raw in busy_strategy()) {
            let window = window();
            let busy = create_busy_intervals(&window, &raw);
            let mut reversed = busy.clone();
            reversed.reverse();

            prop_assert_eq!(
                compute_free_intervals(&window, &busy),
                compute_free_intervals(&window, &reversed)
            );
        }

        #[test]
        fn test_empty_busy_set_yields_window(offset_days in 0i64..365) {
            let start = window().start() + Duration::days(offset_days);
            let window = TimeInterval::new(start, start + Duration::hours(24)).unwrap();
            let free = compute_free_intervals(&window, &[]);

            prop_assert_eq!(free, vec![window]);
        }
    }
}
