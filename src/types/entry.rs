//! Candidate - A regular, non-hidden file found in the source directory

use chrono::{DateTime, Datelike, Local, TimeDelta, TimeZone};
use std::ffi::{OsStr, OsString};
use std::time::{SystemTime, UNIX_EPOCH};

/// A file eligible for copying, found during one directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File name relative to the source directory (no separators), kept as
    /// the raw OS bytes so names that are not valid UTF-8 survive untouched
    pub name: OsString,

    /// Last modification time
    pub mtime: SystemTime,
}

impl Candidate {
    /// Create a new Candidate
    pub fn new(name: impl Into<OsString>, mtime: SystemTime) -> Self {
        Self {
            name: name.into(),
            mtime,
        }
    }

    /// Calendar year of the modification time, in local time
    ///
    /// Returns `None` when the timestamp lies outside the range the calendar
    /// can represent (roughly +/-262,000 years around the epoch).
    pub fn year(&self) -> Option<i32> {
        let (secs, nanos) = match self.mtime.duration_since(UNIX_EPOCH) {
            Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
            Err(e) => {
                let before = e.duration();
                let secs = i64::try_from(before.as_secs()).ok()?;
                match before.subsec_nanos() {
                    0 => (-secs, 0),
                    nanos => (-secs - 1, 1_000_000_000 - nanos),
                }
            }
        };

        let utc = DateTime::from_timestamp(secs, nanos)?.naive_utc();
        let offset = Local.offset_from_utc_datetime(&utc).local_minus_utc();
        let local = utc.checked_add_signed(TimeDelta::seconds(i64::from(offset)))?;
        Some(local.year())
    }

    /// Year bucket directory name, always four digits
    pub fn year_bucket(&self) -> Option<String> {
        self.year().map(|year| format!("{:04}", year))
    }
}

/// Whether a directory entry name marks a hidden file
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}
