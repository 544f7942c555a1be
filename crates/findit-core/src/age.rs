//! Human-readable report age ("5 hours ago") for item cards.

use chrono::{DateTime, Utc};

const UNITS: [(i64, &str); 5] = [
  (31_536_000, "year"),
  (2_592_000, "month"),
  (86_400, "day"),
  (3_600, "hour"),
  (60, "minute"),
];

/// How long before `now` the instant `then` was, in the largest unit of which
/// strictly more than one has elapsed.
pub fn time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let seconds = (now - then).num_seconds();
  if seconds < 0 {
    return "just now".to_owned();
  }
  for (unit_secs, unit) in UNITS {
    // Strictly more than one unit; exactly one hour still reads as minutes.
    if seconds > unit_secs {
      return plural(seconds / unit_secs, unit);
    }
  }
  plural(seconds, "second")
}

fn plural(count: i64, unit: &str) -> String {
  if count == 1 {
    format!("1 {unit} ago")
  } else {
    format!("{count} {unit}s ago")
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn ago(d: Duration) -> String {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    time_since(now - d, now)
  }

  #[test]
  fn picks_largest_unit() {
    assert_eq!(ago(Duration::hours(2)), "2 hours ago");
    assert_eq!(ago(Duration::hours(72)), "3 days ago");
    assert_eq!(ago(Duration::days(400)), "1 year ago");
    assert_eq!(ago(Duration::days(65)), "2 months ago");
    assert_eq!(ago(Duration::seconds(42)), "42 seconds ago");
  }

  #[test]
  fn exactly_one_unit_falls_through_to_smaller_unit() {
    assert_eq!(ago(Duration::hours(1)), "60 minutes ago");
    assert_eq!(ago(Duration::minutes(1)), "60 seconds ago");
  }

  #[test]
  fn singular_between_one_and_two_units() {
    assert_eq!(ago(Duration::minutes(90)), "1 hour ago");
    assert_eq!(ago(Duration::seconds(1)), "1 second ago");
  }

  #[test]
  fn future_timestamps_read_as_just_now() {
    assert_eq!(ago(Duration::seconds(-5)), "just now");
  }
}
