//! # Rollcall Core
//!
//! Core library for Rollcall - a teacher-facing attendance dashboard.
//!
//! This crate holds the edit-tracking and derived-state logic of the
//! dashboard, independent of any terminal or HTTP details.
//!
//! ## Architecture
//!
//! - **status**: Attendance status enumeration and display labels
//! - **roster**: Server-provided student records and rendered rows
//! - **ledger**: Pending, unsaved per-student edits
//! - **derive**: Remaining-lessons projection and severity tiers
//! - **api**: Attendance service contract (roster fetch, batch save)
//! - **interaction**: Confirmation prompts and user notices
//! - **dashboard**: Date-change reconciliation and the save flow

pub mod api;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod interaction;
pub mod ledger;
pub mod roster;
pub mod status;

pub use api::{AppliedItem, AttendanceApi, SaveRequest, SaveResponse};
pub use dashboard::{
    default_min_date, Dashboard, DashboardSettings, DateOutcome, LoadOutcome, LoadTicket, Phase,
    SaveOutcome, DEFAULT_MIN_DATE,
};
pub use derive::{RowState, Severity, CRITICAL_THRESHOLD, WARN_THRESHOLD};
pub use error::{Result, RollcallError};
pub use interaction::{Confirmation, Interaction, Notice, NoticeLevel};
pub use ledger::{EditLedger, ExtraStep, PendingEdit, SaveItem};
pub use roster::{AttendanceMark, Roster, RosterRow, StudentId, StudentRecord};
pub use status::AttendanceStatus;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
