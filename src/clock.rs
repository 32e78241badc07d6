use time::macros::format_description;
use time::{Duration, OffsetDateTime};

/// Fixed shift applied to every generated timestamp, approximating the
/// IST wall clock. A literal constant so output never depends on the
/// host's timezone database.
pub const OFFSET_MINUTES: i64 = 330;

/// Current instant shifted by [`OFFSET_MINUTES`], serialized as an
/// ISO-8601-like string with millisecond precision, e.g.
/// `2024-05-01T15:30:00.123Z`.
pub fn now_with_fixed_offset() -> String {
    format_instant(OffsetDateTime::now_utc())
}

fn format_instant(instant: OffsetDateTime) -> String {
    let shifted = instant + Duration::minutes(OFFSET_MINUTES);
    shifted
        .format(&format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .unwrap_or_default()
}
