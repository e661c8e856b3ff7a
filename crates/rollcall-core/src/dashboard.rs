//! Dashboard controller.
//!
//! Owns the pending-edit ledger, the rendered roster and the selected date,
//! and runs the two guarded flows: date-change reconciliation and batch save.
//!
//! Roster loads carry a generation token. Only the completion of the most
//! recently issued load is applied; anything older is discarded as stale.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::{AttendanceApi, SaveRequest, SaveResponse};
use crate::error::{Result, RollcallError};
use crate::interaction::{Confirmation, Interaction, Notice};
use crate::ledger::{EditLedger, ExtraStep};
use crate::roster::{Roster, RosterRow, StudentId, StudentRecord};
use crate::status::AttendanceStatus;

/// Minimum roster date used when none is configured.
pub const DEFAULT_MIN_DATE: &str = "2025-12-01";

/// Message used when the save endpoint fails without saying why.
const GENERIC_SAVE_ERROR: &str = "Unknown server error";

/// Parsed [`DEFAULT_MIN_DATE`].
pub fn default_min_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_MIN_DATE, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}

/// Static configuration of a dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Earliest date a roster may be requested for.
    pub min_date: NaiveDate,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            min_date: default_min_date(),
        }
    }
}

/// Load state of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(NaiveDate),
}

/// Handle for an issued roster load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub date: NaiveDate,
    pub generation: u64,
}

/// Result of completing a roster load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { date: NaiveDate, students: usize },
    /// Server refused the date; the selection moved to its minimum.
    TooEarly { min_date: NaiveDate },
    Failed { message: String },
    /// A newer load was issued before this one completed.
    Stale,
}

/// Result of a date selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// The user kept their pending edits; nothing was fetched.
    Declined { kept: Option<NaiveDate> },
    Load(LoadOutcome),
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Ledger was empty; no request was sent.
    NothingToSave,
    /// User declined the negative-balance confirmation.
    Cancelled,
    Saved {
        response: SaveResponse,
        reload: LoadOutcome,
    },
    /// Server or transport failure; pending edits are kept.
    Failed { message: String },
}

/// Attendance dashboard for one teacher session.
pub struct Dashboard<A: AttendanceApi> {
    api: A,
    settings: DashboardSettings,
    ledger: EditLedger,
    roster: Option<Roster>,
    selected_date: Option<NaiveDate>,
    phase: Phase,
    generation: u64,
}

impl<A: AttendanceApi> Dashboard<A> {
    pub fn new(api: A, settings: DashboardSettings) -> Self {
        Self {
            api,
            settings,
            ledger: EditLedger::new(),
            roster: None,
            selected_date: None,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Date currently shown in the date selector.
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Date of the roster currently rendered.
    pub fn loaded_date(&self) -> Option<NaiveDate> {
        self.roster.as_ref().map(Roster::date)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// Clamp a requested date to the configured minimum.
    pub fn clamp_date(&self, requested: NaiveDate) -> NaiveDate {
        requested.max(self.settings.min_date)
    }

    /// Switch the dashboard to a date.
    ///
    /// Dates before the minimum are clamped first. If edits are pending and
    /// the date differs from the loaded one, the user must agree to discard
    /// them; declining restores the selector and fetches nothing.
    pub fn select_date(&mut self, requested: NaiveDate, ui: &mut dyn Interaction) -> DateOutcome {
        let date = self.clamp_date(requested);
        if date != requested {
            debug!(%requested, min_date = %date, "clamping requested date");
            ui.notify(&Notice::DateClamped {
                requested,
                min_date: date,
            });
            self.selected_date = Some(date);
        }

        let loaded = self.loaded_date();
        if !self.ledger.is_empty() && Some(date) != loaded {
            let question = Confirmation::DiscardEdits {
                pending: self.ledger.len(),
                from: loaded,
                to: date,
            };
            if !ui.confirm(&question) {
                debug!(%date, "date change declined, keeping pending edits");
                self.selected_date = loaded;
                return DateOutcome::Declined { kept: loaded };
            }
            debug!(discarded = self.ledger.len(), "discarding pending edits");
            self.ledger.clear();
            if let Some(roster) = self.roster.as_mut() {
                roster.refresh_all(&self.ledger);
            }
        }

        DateOutcome::Load(self.load(date, ui))
    }

    /// Re-fetch the loaded date, keeping pending edits.
    pub fn reload(&mut self, ui: &mut dyn Interaction) -> Result<LoadOutcome> {
        let date = self.loaded_date().ok_or(RollcallError::NoDateLoaded)?;
        Ok(self.load(date, ui))
    }

    /// Issue a roster load. Any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self, date: NaiveDate) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading(date);
        self.selected_date = Some(date);
        debug!(%date, generation = self.generation, "roster load issued");
        LoadTicket {
            date,
            generation: self.generation,
        }
    }

    /// Apply the result of a roster load issued with [`Dashboard::begin_load`].
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<StudentRecord>>,
        ui: &mut dyn Interaction,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                date = %ticket.date,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale roster response"
            );
            return LoadOutcome::Stale;
        }
        self.phase = Phase::Idle;

        match result {
            Ok(records) => {
                let roster = Roster::build(ticket.date, records, &self.ledger);
                let students = roster.len();
                info!(date = %ticket.date, students, "roster loaded");
                self.roster = Some(roster);
                LoadOutcome::Loaded {
                    date: ticket.date,
                    students,
                }
            }
            Err(RollcallError::DateTooEarly { min_date }) => {
                warn!(date = %ticket.date, %min_date, "server rejected date as too early");
                ui.notify(&Notice::ServerMinDate { min_date });
                self.selected_date = Some(min_date);
                LoadOutcome::TooEarly { min_date }
            }
            Err(err) => {
                warn!(date = %ticket.date, error = %err, "roster load failed");
                let message = err.to_string();
                ui.notify(&Notice::LoadFailed(message.clone()));
                // Nothing rendered yet: keep the attempted date for a retry.
                self.selected_date = self.loaded_date().or(Some(ticket.date));
                LoadOutcome::Failed { message }
            }
        }
    }

    fn load(&mut self, date: NaiveDate, ui: &mut dyn Interaction) -> LoadOutcome {
        let ticket = self.begin_load(date);
        let result = self.api.fetch_roster(date);
        self.finish_load(ticket, result, ui)
    }

    /// Set or unset a student's status and recompute the row.
    pub fn set_status(
        &mut self,
        student_id: StudentId,
        status: Option<AttendanceStatus>,
    ) -> Result<&RosterRow> {
        let roster = self.roster.as_mut().ok_or(RollcallError::NoDateLoaded)?;
        if !roster.contains(student_id) {
            return Err(RollcallError::UnknownStudent(student_id));
        }
        self.ledger.set_status(student_id, status);
        roster.refresh(student_id, &self.ledger)
    }

    /// Step a student's extra-lesson count and recompute the row.
    pub fn adjust_extra(&mut self, student_id: StudentId, step: ExtraStep) -> Result<&RosterRow> {
        let roster = self.roster.as_mut().ok_or(RollcallError::NoDateLoaded)?;
        if !roster.contains(student_id) {
            return Err(RollcallError::UnknownStudent(student_id));
        }
        self.ledger.adjust_extra(student_id, step);
        roster.refresh(student_id, &self.ledger)
    }

    /// Submit pending edits for the loaded date.
    ///
    /// On success the ledger is cleared and the saved date is fetched again
    /// so rows show the server's recomputed balances. On failure the ledger
    /// is kept for a retry.
    pub fn save(&mut self, ui: &mut dyn Interaction) -> Result<SaveOutcome> {
        if self.ledger.is_empty() {
            ui.notify(&Notice::NothingToSave);
            return Ok(SaveOutcome::NothingToSave);
        }
        if let Phase::Loading(date) = self.phase {
            return Err(RollcallError::LoadInProgress(date));
        }
        let roster = self.roster.as_ref().ok_or(RollcallError::NoDateLoaded)?;
        let date = roster.date();

        let negative_rows = roster.negative_count();
        if negative_rows > 0
            && !ui.confirm(&Confirmation::SaveWithNegative {
                rows: negative_rows,
            })
        {
            debug!(negative_rows, "save cancelled by user");
            return Ok(SaveOutcome::Cancelled);
        }

        let request = SaveRequest {
            date,
            items: self.ledger.to_save_items(),
        };
        debug!(%date, items = request.items.len(), "submitting attendance batch");

        match self.api.save_batch(&request) {
            Ok(response) if response.success => {
                info!(%date, items = request.items.len(), "attendance batch saved");
                self.ledger.clear();
                if let Some(roster) = self.roster.as_mut() {
                    roster.refresh_all(&self.ledger);
                }
                ui.notify(&Notice::Saved {
                    items: request.items.len(),
                    rejected: response.rejected().cloned().collect(),
                });
                let reload = self.load(date, ui);
                Ok(SaveOutcome::Saved { response, reload })
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string());
                warn!(%date, error = %message, "attendance batch rejected");
                ui.notify(&Notice::SaveFailed(message.clone()));
                Ok(SaveOutcome::Failed { message })
            }
            Err(err) => {
                warn!(%date, error = %err, "attendance batch failed");
                let message = err.to_string();
                ui.notify(&Notice::SaveFailed(message.clone()));
                Ok(SaveOutcome::Failed { message })
            }
        }
    }
}
