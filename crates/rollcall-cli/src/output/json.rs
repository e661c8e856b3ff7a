//! JSON output formatting.

use serde_json::{json, Value};

use rollcall_core::{EditLedger, Notice, Roster, RosterRow, SaveOutcome};

/// Convert one roster row to JSON.
pub fn row_json(row: &RosterRow) -> Value {
    let record = &row.record;
    json!({
        "id": record.id,
        "name": record.display_name(),
        "student_code": record.student_code,
        "package": record.package_label(),
        "needs_book": record.needs_book.unwrap_or(false),
        "remaining_lessons": record.remaining_lessons,
        "resulting_remaining": row.state.resulting,
        "debt": record.debt,
        "severity": row.state.severity,
        "negative_warning": row.state.negative_warning,
        "status": row.status,
        "server_status": record.server_status(),
        "checkin_time": record.attendance.as_ref().and_then(|a| a.checkin_time.clone()),
        "extra_lessons": row.extra_lessons(),
        "modified": row.is_modified(),
    })
}

/// Convert a loaded roster to JSON.
pub fn roster_json(roster: &Roster, ledger: &EditLedger) -> Value {
    json!({
        "date": roster.date(),
        "pending": ledger.len(),
        "students": roster.rows().iter().map(row_json).collect::<Vec<_>>(),
    })
}

/// Convert a save outcome and the notices it produced to JSON.
pub fn save_json(outcome: &SaveOutcome, notices: &[Notice]) -> Value {
    let notices: Vec<String> = notices.iter().map(|n| n.to_string()).collect();
    match outcome {
        SaveOutcome::NothingToSave => json!({
            "status": "nothing_to_save",
            "notices": notices,
        }),
        SaveOutcome::Cancelled => json!({
            "status": "cancelled",
            "notices": notices,
        }),
        SaveOutcome::Saved { response, .. } => json!({
            "status": "saved",
            "applied": response.applied,
            "notices": notices,
        }),
        SaveOutcome::Failed { message } => json!({
            "status": "failed",
            "error": message,
            "notices": notices,
        }),
    }
}
