//! Attendance service contract.
//!
//! The `AttendanceApi` trait is the seam between the dashboard and whatever
//! transport reaches the server. The CLI implements it over HTTP; tests use
//! in-memory fakes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RollcallError};
use crate::ledger::SaveItem;
use crate::roster::{StudentId, StudentRecord};

/// Error code the roster and save endpoints use for dates before the minimum.
pub const DATE_TOO_EARLY: &str = "date_too_early";

/// Body of a batch save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub date: NaiveDate,
    pub items: Vec<SaveItem>,
}

/// Per-student result reported by the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedItem {
    pub student_id: StudentId,
    pub applied: bool,
    #[serde(default)]
    pub new_remaining: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub applied: Vec<AppliedItem>,
}

impl SaveResponse {
    /// Items the server declined to apply.
    pub fn rejected(&self) -> impl Iterator<Item = &AppliedItem> {
        self.applied.iter().filter(|item| !item.applied)
    }
}

/// Attendance service used by the dashboard.
pub trait AttendanceApi {
    /// Fetch the roster for a date.
    ///
    /// # Errors
    ///
    /// Returns `RollcallError::DateTooEarly` when the server rejects the date,
    /// `RollcallError::Server` for other non-2xx answers and
    /// `RollcallError::Transport` when no answer arrived.
    fn fetch_roster(&self, date: NaiveDate) -> Result<Vec<StudentRecord>>;

    /// Submit a batch of pending edits.
    ///
    /// An application-level failure is reported as `Ok` with
    /// `success == false`; only transport and HTTP failures are errors.
    fn save_batch(&mut self, request: &SaveRequest) -> Result<SaveResponse>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    min_date: Option<String>,
}

/// Map a non-2xx response to an error.
///
/// `fallback_min_date` is used when the server reports `date_too_early`
/// without (or with an unparseable) `minDate`.
pub fn classify_error_response(
    status: u16,
    body: &str,
    fallback_min_date: NaiveDate,
) -> RollcallError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if parsed.error.as_deref() == Some(DATE_TOO_EARLY) => {
            let min_date = parsed
                .min_date
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
                .unwrap_or(fallback_min_date);
            RollcallError::DateTooEarly { min_date }
        }
        Ok(ErrorBody {
            error: Some(message),
            ..
        }) => RollcallError::Server { status, message },
        _ => {
            let text = body.trim();
            let message = if text.is_empty() {
                "Server error".to_string()
            } else {
                text.to_string()
            };
            RollcallError::Server { status, message }
        }
    }
}
