//! Date formatting for wire payloads and raw log stamps.
//!
//! RULE: Formats are built once per client and never mutated.
//! There is no process-wide formatter.

use chrono::{DateTime, Utc};

pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
pub const LOG_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    wire:      &'static str,
    log_stamp: &'static str,
}

impl DateFormats {
    pub fn new() -> Self {
        Self {
            wire: WIRE_FORMAT,
            log_stamp: LOG_STAMP_FORMAT,
        }
    }

    /// `YYYY-MM-DDTHH:mm:ss.SSSZ`, always UTC.
    pub fn to_wire(&self, date: &DateTime<Utc>) -> String {
        date.format(self.wire).to_string()
    }

    pub fn log_stamp(&self, date: &DateTime<Utc>) -> String {
        date.format(self.log_stamp).to_string()
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wire_format_has_millis_and_zulu_suffix() {
        let fmt = DateFormats::new();
        let date = Utc.with_ymd_and_hms(2016, 1, 13, 9, 5, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(fmt.to_wire(&date), "2016-01-13T09:05:07.042Z");
    }

    #[test]
    fn log_stamp_drops_subseconds() {
        let fmt = DateFormats::new();
        let date = Utc.with_ymd_and_hms(2016, 11, 23, 18, 0, 1).unwrap();
        assert_eq!(fmt.log_stamp(&date), "2016-11-23 18:00:01");
    }
}
