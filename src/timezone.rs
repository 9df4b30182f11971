//! Resolving the server's configured timezone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The timezone used when none is given on the command line.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Get the current UTC offset of a canonical timezone name such as
/// "America/Sao_Paulo", or `None` if the name is unknown.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}
