//! Attendance status values.
//!
//! The server speaks upper-case string literals (`PRESENT`, `LATE`, ...).
//! An unset status is modelled as `Option::None` everywhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RollcallError;

/// Label shown for a student with no status for the date.
pub const UNSET_LABEL: &str = "Not marked";

/// Attendance status of a student on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    /// Does not consume a lesson on the server side.
    Excused,
}

impl AttendanceStatus {
    /// All statuses in the order the action buttons are offered.
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
        AttendanceStatus::Absent,
    ];

    /// Wire code used by the attendance service.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Present => "PRESENT",
            Self::Late => "LATE",
            Self::Absent => "ABSENT",
            Self::Excused => "EXCUSED",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Late => "Late",
            Self::Absent => "Absent",
            Self::Excused => "Excused",
        }
    }
}

/// Label for an optional status, falling back to [`UNSET_LABEL`].
pub fn status_label(status: Option<AttendanceStatus>) -> &'static str {
    status.map(|s| s.label()).unwrap_or(UNSET_LABEL)
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceStatus {
    type Err = RollcallError;

    /// Accepts wire codes, labels (case-insensitive) and one-letter shorthands.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Self::Present),
            "late" | "l" => Ok(Self::Late),
            "absent" | "a" => Ok(Self::Absent),
            "excused" | "e" => Ok(Self::Excused),
            other => Err(RollcallError::InvalidInput(format!(
                "unknown attendance status \"{}\" (use present, late, absent, excused)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_match_serde() {
        for status in AttendanceStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.code()));
        }
    }

    #[test]
    fn test_parse_accepts_codes_and_shorthands() {
        assert_eq!(
            "PRESENT".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Present
        );
        assert_eq!("l".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Late);
        assert_eq!(
            " Excused ".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Excused
        );
        assert!("sick".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_unset_label() {
        assert_eq!(status_label(None), "Not marked");
        assert_eq!(status_label(Some(AttendanceStatus::Absent)), "Absent");
    }

    #[test]
    fn test_unknown_code_fails_to_deserialize() {
        let parsed: std::result::Result<AttendanceStatus, _> = serde_json::from_str("\"SICK\"");
        assert!(parsed.is_err());
    }
}
