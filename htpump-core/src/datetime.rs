//! Device date/time wire format
//!
//! The heat pump transmits timestamps as `DD.MM.YY-HH:MM:SS` (fault list)
//! and as separate `DA=DD.MM.YY` / `TI=HH:MM:SS` fields (clock commands).
//! The API boundary uses [`chrono::NaiveDateTime`]; two-digit years map
//! into the 2000s.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{HtpError, HtpResult};

/// `DD.MM.YY-HH:MM:SS`, as used in fault-list entries.
pub const WIRE_DATETIME_FORMAT: &str = "%d.%m.%y-%H:%M:%S";

/// `DD.MM.YY`, as used in the `DA=` field of clock commands.
pub const WIRE_DATE_FORMAT: &str = "%d.%m.%y";

/// `HH:MM:SS`, as used in the `TI=` field of clock commands.
pub const WIRE_TIME_FORMAT: &str = "%H:%M:%S";

/// Parse a `DD.MM.YY-HH:MM:SS` timestamp.
pub fn parse_wire_datetime(s: &str) -> HtpResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, WIRE_DATETIME_FORMAT)
        .map_err(|e| HtpError::InvalidData(format!("invalid timestamp {s:?}: {e}")))
}

/// Parse separate `DD.MM.YY` and `HH:MM:SS` fields into one timestamp.
pub fn parse_wire_date_time(date: &str, time: &str) -> HtpResult<NaiveDateTime> {
    let d = NaiveDate::parse_from_str(date, WIRE_DATE_FORMAT)
        .map_err(|e| HtpError::InvalidData(format!("invalid date {date:?}: {e}")))?;
    let t = NaiveTime::parse_from_str(time, WIRE_TIME_FORMAT)
        .map_err(|e| HtpError::InvalidData(format!("invalid time {time:?}: {e}")))?;
    Ok(d.and_time(t))
}

/// Render the `DA=` field of a clock set command.
pub fn format_wire_date(dt: &NaiveDateTime) -> String {
    dt.format(WIRE_DATE_FORMAT).to_string()
}

/// Render the `TI=` field of a clock set command.
pub fn format_wire_time(dt: &NaiveDateTime) -> String {
    dt.format(WIRE_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_fault_timestamp() {
        let dt = parse_wire_datetime("14.09.14-11:52:08").unwrap();
        assert_eq!(dt.year(), 2014);
        assert_eq!(dt.month(), 9);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 11);
        assert_eq!(dt.minute(), 52);
        assert_eq!(dt.second(), 8);
    }

    #[test]
    fn test_parse_clock_fields() {
        let dt = parse_wire_date_time("26.11.15", "21:28:57").unwrap();
        assert_eq!(dt.year(), 2015);
        assert_eq!(format_wire_date(&dt), "26.11.15");
        assert_eq!(format_wire_time(&dt), "21:28:57");
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        assert!(parse_wire_datetime("32.01.15-00:00:00").is_err());
        assert!(parse_wire_date_time("26.11.15", "25:00:00").is_err());
    }
}
