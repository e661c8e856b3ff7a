use chrono::NaiveDate;

use rollcall_core::{AttendanceStatus, StudentId};

use crate::errors::CliError;

/// Words that clear a pending status back to "Not marked".
const UNSET_WORDS: [&str; 3] = ["none", "unset", "-"];

/// Parse a roster date (YYYY-MM-DD).
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

/// Parse a status word; `None` means unset.
pub fn parse_status(value: &str) -> anyhow::Result<Option<AttendanceStatus>> {
    let value = value.trim();
    if UNSET_WORDS
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
    {
        return Ok(None);
    }
    value
        .parse::<AttendanceStatus>()
        .map(Some)
        .map_err(|_| {
            CliError::invalid_input(format!(
                "Unknown status: {} (use present, late, absent, excused or none)",
                value
            ))
            .into()
        })
}

/// Parse `ID=STATUS`.
pub fn parse_status_assignment(
    value: &str,
) -> anyhow::Result<(StudentId, Option<AttendanceStatus>)> {
    let (id, status) = split_assignment(value, "ID=STATUS")?;
    Ok((id, parse_status(status)?))
}

/// Parse `ID=+N` or `ID=-N` into a signed step count.
pub fn parse_extra_assignment(value: &str) -> anyhow::Result<(StudentId, i32)> {
    let (id, amount) = split_assignment(value, "ID=+N")?;
    let amount = amount.trim();
    let parsed = amount
        .strip_prefix('+')
        .unwrap_or(amount)
        .parse::<i32>()
        .map_err(|_| {
            CliError::invalid_input(format!("Invalid extra-lesson count in {}", value))
        })?;
    Ok((id, parsed))
}

fn split_assignment<'v>(value: &'v str, shape: &str) -> anyhow::Result<(StudentId, &'v str)> {
    let (id, rest) = value
        .split_once('=')
        .ok_or_else(|| CliError::invalid_input(format!("Expected {}: {}", shape, value)))?;
    let id = id
        .trim()
        .parse::<StudentId>()
        .map_err(|_| CliError::invalid_input(format!("Invalid student ID in {}", value)))?;
    Ok((id, rest))
}
