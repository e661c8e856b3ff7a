//! Roster records and rendered rows.
//!
//! [`StudentRecord`] mirrors the JSON the roster endpoint returns. A
//! [`Roster`] overlays the pending-edit ledger on those records and keeps
//! one derived [`RosterRow`] per student.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::derive::RowState;
use crate::error::{Result, RollcallError};
use crate::ledger::{EditLedger, PendingEdit};
use crate::status::AttendanceStatus;

/// Server-side student identifier.
pub type StudentId = i64;

/// Attendance already recorded on the server for the roster date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub checkin_time: Option<String>,
}

/// One student as returned by the roster endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub lesson_package_title: Option<String>,
    #[serde(default)]
    pub needs_book: Option<bool>,
    #[serde(default)]
    pub remaining_lessons: Option<i32>,
    #[serde(default)]
    pub debt: Option<f64>,
    #[serde(default)]
    pub attendance: Option<AttendanceMark>,
}

impl StudentRecord {
    /// "Last First", skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.last_name.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Package code, else package title, else "-".
    pub fn package_label(&self) -> &str {
        self.package_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.lesson_package_title.as_deref())
            .unwrap_or("-")
    }

    pub fn book_label(&self) -> &'static str {
        if self.needs_book == Some(true) {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn debt_display(&self) -> String {
        match self.debt {
            Some(debt) => format_amount(debt),
            None => "-".to_string(),
        }
    }

    /// Status stored on the server for the roster date.
    pub fn server_status(&self) -> Option<AttendanceStatus> {
        self.attendance.as_ref().and_then(|a| a.status)
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// A student record with pending edits and derived state applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub record: StudentRecord,
    /// Pending status if any, else the server status.
    pub status: Option<AttendanceStatus>,
    pub pending: Option<PendingEdit>,
    pub state: RowState,
}

impl RosterRow {
    fn build(record: StudentRecord, ledger: &EditLedger) -> Self {
        let mut row = Self {
            record,
            status: None,
            pending: None,
            state: RowState::default(),
        };
        row.recompute(ledger);
        row
    }

    fn recompute(&mut self, ledger: &EditLedger) {
        self.pending = ledger.get(self.record.id);
        self.status = self
            .pending
            .and_then(|p| p.status)
            .or_else(|| self.record.server_status());
        let extra = self.pending.map(|p| p.extra_lessons).unwrap_or(0);
        self.state = RowState::compute(self.record.remaining_lessons, extra, self.record.debt);
    }

    pub fn id(&self) -> StudentId {
        self.record.id
    }

    pub fn is_modified(&self) -> bool {
        self.pending.is_some()
    }

    pub fn extra_lessons(&self) -> i32 {
        self.pending.map(|p| p.extra_lessons).unwrap_or(0)
    }
}

/// Rendered roster for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    date: NaiveDate,
    rows: Vec<RosterRow>,
}

impl Roster {
    /// Build rows from freshly fetched records, seeding them from the ledger.
    pub fn build(date: NaiveDate, records: Vec<StudentRecord>, ledger: &EditLedger) -> Self {
        let rows = records
            .into_iter()
            .map(|record| RosterRow::build(record, ledger))
            .collect();
        Self { date, rows }
    }

    /// Recompute one student's row after a ledger mutation.
    pub fn refresh(&mut self, student_id: StudentId, ledger: &EditLedger) -> Result<&RosterRow> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == student_id)
            .ok_or(RollcallError::UnknownStudent(student_id))?;
        row.recompute(ledger);
        Ok(row)
    }

    /// Recompute every row, e.g. after the ledger was cleared.
    pub fn refresh_all(&mut self, ledger: &EditLedger) {
        for row in &mut self.rows {
            row.recompute(ledger);
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn get(&self, student_id: StudentId) -> Option<&RosterRow> {
        self.rows.iter().find(|row| row.id() == student_id)
    }

    pub fn contains(&self, student_id: StudentId) -> bool {
        self.get(student_id).is_some()
    }

    /// Rows whose projected balance is negative.
    pub fn negative_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.state.negative_warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Severity;
    use crate::ledger::ExtraStep;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 3).unwrap()
    }

    fn record(id: StudentId, remaining: Option<i32>, debt: Option<f64>) -> StudentRecord {
        StudentRecord {
            id,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            student_code: None,
            package_type: None,
            lesson_package_title: None,
            needs_book: None,
            remaining_lessons: remaining,
            debt,
            attendance: None,
        }
    }

    #[test]
    fn test_deserializes_server_payload() {
        let json = r#"[{
            "id": 12,
            "firstName": "Ivan",
            "lastName": "Petrov",
            "studentCode": "S-12",
            "packageType": "PACK8",
            "lessonPackageTitle": null,
            "remainingLessons": 3,
            "needsBook": true,
            "debt": 0,
            "attendance": {"status": "LATE", "checkinTime": "2025-12-03T10:00"}
        }, {
            "id": 13,
            "firstName": "Olga",
            "lastName": "Sidorova",
            "remainingLessons": null,
            "attendance": null,
            "unexpected": "ignored"
        }]"#;
        let records: Vec<StudentRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name(), "Petrov Ivan");
        assert_eq!(records[0].server_status(), Some(AttendanceStatus::Late));
        assert_eq!(records[0].package_label(), "PACK8");
        assert_eq!(records[0].book_label(), "Yes");
        assert_eq!(records[0].debt_display(), "0");
        assert_eq!(records[1].remaining_lessons, None);
        assert_eq!(records[1].debt, None);
        assert_eq!(records[1].debt_display(), "-");
        assert_eq!(records[1].package_label(), "-");
    }

    #[test]
    fn test_rows_overlay_pending_status() {
        let mut server = record(1, Some(5), None);
        server.attendance = Some(AttendanceMark {
            status: Some(AttendanceStatus::Absent),
            checkin_time: None,
        });
        let mut ledger = EditLedger::new();
        let roster = Roster::build(date(), vec![server.clone()], &ledger);
        assert_eq!(roster.rows()[0].status, Some(AttendanceStatus::Absent));
        assert!(!roster.rows()[0].is_modified());

        ledger.set_status(1, Some(AttendanceStatus::Present));
        let roster = Roster::build(date(), vec![server], &ledger);
        assert_eq!(roster.rows()[0].status, Some(AttendanceStatus::Present));
        assert!(roster.rows()[0].is_modified());
    }

    #[test]
    fn test_refresh_recomputes_single_row() {
        let mut ledger = EditLedger::new();
        let mut roster = Roster::build(
            date(),
            vec![record(1, Some(4), None), record(2, Some(1), None)],
            &ledger,
        );
        assert_eq!(roster.get(1).unwrap().state.severity, Severity::Normal);

        ledger.adjust_extra(1, ExtraStep::Increment);
        let row = roster.refresh(1, &ledger).unwrap();
        assert_eq!(row.state.resulting, Some(3));
        assert_eq!(row.state.severity, Severity::Warn);
        assert_eq!(roster.get(2).unwrap().state.severity, Severity::Low);
    }

    #[test]
    fn test_refresh_unknown_student_fails() {
        let ledger = EditLedger::new();
        let mut roster = Roster::build(date(), vec![record(1, Some(4), None)], &ledger);
        assert!(matches!(
            roster.refresh(99, &ledger),
            Err(RollcallError::UnknownStudent(99))
        ));
    }

    #[test]
    fn test_negative_count_tracks_projection() {
        let mut ledger = EditLedger::new();
        let mut roster = Roster::build(date(), vec![record(1, Some(0), Some(3.0))], &ledger);
        assert_eq!(roster.negative_count(), 0);
        ledger.adjust_extra(1, ExtraStep::Increment);
        roster.refresh(1, &ledger).unwrap();
        assert_eq!(roster.negative_count(), 1);
        ledger.clear();
        roster.refresh_all(&ledger);
        assert_eq!(roster.negative_count(), 0);
    }

    #[test]
    fn test_display_name_skips_missing_parts() {
        let mut r = record(1, None, None);
        r.first_name = None;
        assert_eq!(r.display_name(), "Lovelace");
        assert_eq!(format_amount(12.5), "12.50");
    }
}
