//! Local day-boundary arithmetic.
//!
//! All functions are generic over the time zone so they can be exercised
//! with fixed offsets; the service itself runs on [`chrono::Local`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::time::Duration;

/// Longest span probed forward when a local time falls into a DST gap.
const GAP_PROBE_MINUTES: i64 = 48 * 60;

/// First instant of the calendar day after `now`, in `now`'s zone.
pub fn start_of_next_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    next_day_at(now, NaiveTime::MIN)
}

/// `time` on the calendar day after `now`, in `now`'s zone.
///
/// A local time skipped by a DST transition resolves to the first valid
/// instant after it; a repeated one resolves to its earlier occurrence.
pub fn next_day_at<Tz: TimeZone>(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
    resolve_local(&now.timezone(), tomorrow.and_time(time))
}

/// Time left from `now` until `target`; zero when `target` has passed.
pub fn delay_until<Tz: TimeZone>(now: &DateTime<Tz>, target: &DateTime<Tz>) -> Duration {
    target
        .clone()
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Time left from `now` until the next local midnight.
pub fn delay_until_next_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    delay_until(now, &start_of_next_day(now))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
        return resolved;
    }

    let mut probe = naive;
    for _ in 0..GAP_PROBE_MINUTES {
        probe += chrono::Duration::minutes(1);
        if let Some(resolved) = tz.from_local_datetime(&probe).earliest() {
            return resolved;
        }
    }

    tz.from_utc_datetime(&naive)
}
