//! Pending-edit ledger.
//!
//! Holds unsaved per-student edits between a roster load and a save. An entry
//! exists only while it carries a change: an unset status together with a
//! zero extra-lesson delta is removed immediately.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roster::StudentId;
use crate::status::AttendanceStatus;

/// Unsaved edit for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PendingEdit {
    /// Overrides the server attendance status when set.
    pub status: Option<AttendanceStatus>,
    /// Extra lessons to charge; may go negative.
    pub extra_lessons: i32,
}

impl PendingEdit {
    pub fn is_noop(&self) -> bool {
        self.status.is_none() && self.extra_lessons == 0
    }
}

/// Single step applied to an extra-lesson counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraStep {
    Increment,
    Decrement,
}

impl ExtraStep {
    pub fn delta(&self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

/// One element of a batch save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItem {
    pub student_id: StudentId,
    pub status: Option<AttendanceStatus>,
    pub extra_lessons: i32,
}

/// Map of pending edits keyed by student id.
#[derive(Debug, Clone, Default)]
pub struct EditLedger {
    entries: BTreeMap<StudentId, PendingEdit>,
}

impl EditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or unset) the status for a student, keeping any extra-lesson delta.
    pub fn set_status(&mut self, student_id: StudentId, status: Option<AttendanceStatus>) {
        let mut edit = self.get(student_id).unwrap_or_default();
        edit.status = status;
        self.store(student_id, edit);
    }

    /// Apply one extra-lesson step, keeping any status. Returns the new delta.
    pub fn adjust_extra(&mut self, student_id: StudentId, step: ExtraStep) -> i32 {
        let mut edit = self.get(student_id).unwrap_or_default();
        edit.extra_lessons += step.delta();
        self.store(student_id, edit);
        edit.extra_lessons
    }

    /// Drop every pending edit.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Flatten the ledger into save items, ordered by student id.
    pub fn to_save_items(&self) -> Vec<SaveItem> {
        self.entries
            .iter()
            .map(|(student_id, edit)| SaveItem {
                student_id: *student_id,
                status: edit.status,
                extra_lessons: edit.extra_lessons,
            })
            .collect()
    }

    pub fn get(&self, student_id: StudentId) -> Option<PendingEdit> {
        self.entries.get(&student_id).copied()
    }

    /// Extra-lesson delta for a student, 0 when there is no entry.
    pub fn extra_lessons(&self, student_id: StudentId) -> i32 {
        self.get(student_id).map(|e| e.extra_lessons).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StudentId, PendingEdit)> + '_ {
        self.entries.iter().map(|(id, edit)| (*id, *edit))
    }

    fn store(&mut self, student_id: StudentId, edit: PendingEdit) {
        if edit.is_noop() {
            self.entries.remove(&student_id);
        } else {
            self.entries.insert(student_id, edit);
        }
    }
}
