//! User interaction seam.
//!
//! The dashboard never talks to a terminal directly. Guard conditions are
//! resolved through [`Interaction::confirm`] and outcomes are reported via
//! [`Interaction::notify`].

use std::fmt;

use chrono::NaiveDate;

use crate::api::AppliedItem;

/// Question the dashboard needs answered before proceeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Changing the date would drop pending edits.
    DiscardEdits {
        pending: usize,
        from: Option<NaiveDate>,
        to: NaiveDate,
    },
    /// Some rows would end with a negative lesson balance.
    SaveWithNegative { rows: usize },
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::DiscardEdits { pending, to, .. } => write!(
                f,
                "There are {} unsaved change(s); switching to {} will discard them. Continue?",
                pending, to
            ),
            Confirmation::SaveWithNegative { rows } => write!(
                f,
                "{} row(s) would end with a negative lesson balance. Save anyway?",
                rows
            ),
        }
    }
}

/// Severity of a notice, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Message the dashboard reports to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Requested date was before the configured minimum.
    DateClamped {
        requested: NaiveDate,
        min_date: NaiveDate,
    },
    /// Server rejected the date as too early.
    ServerMinDate { min_date: NaiveDate },
    LoadFailed(String),
    NothingToSave,
    Saved {
        items: usize,
        rejected: Vec<AppliedItem>,
    },
    SaveFailed(String),
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::DateClamped { .. } | Notice::ServerMinDate { .. } => NoticeLevel::Warning,
            Notice::NothingToSave => NoticeLevel::Info,
            Notice::Saved { rejected, .. } if rejected.is_empty() => NoticeLevel::Success,
            Notice::Saved { .. } => NoticeLevel::Warning,
            Notice::LoadFailed(_) | Notice::SaveFailed(_) => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DateClamped {
                requested,
                min_date,
            } => write!(
                f,
                "{} is earlier than the allowed minimum; using {} instead",
                requested, min_date
            ),
            Notice::ServerMinDate { min_date } => write!(
                f,
                "The server rejected the date as earlier than its minimum: {}",
                min_date
            ),
            Notice::LoadFailed(message) => write!(f, "Could not load the roster: {}", message),
            Notice::NothingToSave => write!(f, "No changes to save"),
            Notice::Saved { items, rejected } => {
                write!(f, "Saved {} change(s)", items)?;
                if !rejected.is_empty() {
                    let details = rejected
                        .iter()
                        .map(|item| {
                            format!(
                                "{} ({})",
                                item.student_id,
                                item.error.as_deref().unwrap_or("not applied")
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "; not applied: {}", details)?;
                }
                Ok(())
            }
            Notice::SaveFailed(message) => write!(f, "Save failed: {}", message),
        }
    }
}

/// Front end used by the dashboard for prompts and notices.
pub trait Interaction {
    /// Ask a yes/no question. `false` aborts the guarded action.
    fn confirm(&mut self, question: &Confirmation) -> bool;

    /// Report an outcome to the user.
    fn notify(&mut self, notice: &Notice);
}
