//! Command handlers.

pub mod init;
pub mod mark;
pub mod misc;
pub mod roster;
pub mod session;

use chrono::NaiveDate;

use rollcall_core::{Dashboard, DateOutcome, LoadOutcome, RollcallError};

use crate::app::AppContext;
use crate::errors::CliError;
use crate::http::HttpAttendanceApi;
use crate::ui::TerminalInteraction;

/// Build a dashboard and load `date` into it.
///
/// Fails with `SERVER_FAILED` when the roster could not be loaded; the
/// dashboard has already reported the reason through `ui`.
pub(crate) fn open_dashboard(
    ctx: &AppContext,
    ui: &mut TerminalInteraction,
    date: NaiveDate,
) -> anyhow::Result<Dashboard<HttpAttendanceApi>> {
    let mut dashboard = Dashboard::new(ctx.api()?, ctx.settings()?);
    let outcome = ui.spinning("Loading roster", |ui| dashboard.select_date(date, ui));

    match outcome {
        DateOutcome::Load(LoadOutcome::Loaded { .. }) => Ok(dashboard),
        DateOutcome::Load(LoadOutcome::TooEarly { min_date }) => Err(CliError::server_failed(
            format!("Roster not loaded: dates before {} are not available", min_date),
        )
        .into()),
        DateOutcome::Load(LoadOutcome::Failed { .. }) | DateOutcome::Load(LoadOutcome::Stale) => {
            Err(CliError::server_failed(format!(
                "Roster not loaded for {} ({})",
                dashboard.selected_date().unwrap_or(date),
                dashboard.api().base_url()
            ))
            .into())
        }
        DateOutcome::Declined { .. } => Err(anyhow::anyhow!("Date change declined")),
    }
}

/// Map core errors from edits to CLI errors with exit codes.
pub(crate) fn edit_error(err: RollcallError) -> anyhow::Error {
    match err {
        RollcallError::UnknownStudent(id) => CliError::not_found(
            format!("Student {} is not on the loaded roster", id),
            "Hint: Run `rollcall roster` to list student IDs.",
        )
        .into(),
        RollcallError::InvalidInput(message) => CliError::invalid_input(message).into(),
        other => other.into(),
    }
}
