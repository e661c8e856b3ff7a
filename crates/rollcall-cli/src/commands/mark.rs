use rollcall_core::{ExtraStep, SaveOutcome};

use crate::app::AppContext;
use crate::cli::MarkArgs;
use crate::errors::CliError;
use crate::helpers::{parse_extra_assignment, parse_status_assignment};
use crate::output::save_json;
use crate::ui::{blank_line, print, receipt, roster_table, TerminalInteraction};

use super::{edit_error, open_dashboard};

pub fn handle_mark(ctx: &AppContext, args: &MarkArgs) -> anyhow::Result<()> {
    if args.status.is_empty() && args.extra.is_empty() {
        return Err(CliError::invalid_input(
            "Nothing to mark: pass --status ID=STATUS or --extra ID=+N",
        )
        .into());
    }

    // Parse everything before touching the server.
    let statuses = args
        .status
        .iter()
        .map(|s| parse_status_assignment(s))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let extras = args
        .extra
        .iter()
        .map(|s| parse_extra_assignment(s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let ui_ctx = ctx.ui_context(args.json, None);
    let date = ctx.resolve_date(args.date.as_deref())?;
    let mut ui = TerminalInteraction::new(&ui_ctx, args.yes, ctx.quiet());
    let mut dashboard = open_dashboard(ctx, &mut ui, date)?;

    // Edits are written for `date`; never apply them to a clamped one.
    if let Some(loaded) = dashboard.loaded_date().filter(|loaded| *loaded != date) {
        return Err(CliError::invalid_input(format!(
            "Nothing marked: {} is before the earliest attendance date {}",
            date, loaded
        ))
        .into());
    }

    for (student_id, status) in statuses {
        dashboard
            .set_status(student_id, status)
            .map_err(edit_error)?;
    }
    for (student_id, amount) in extras {
        let step = if amount < 0 {
            ExtraStep::Decrement
        } else {
            ExtraStep::Increment
        };
        for _ in 0..amount.unsigned_abs() {
            dashboard.adjust_extra(student_id, step).map_err(edit_error)?;
        }
    }

    let pending = dashboard.ledger().len();
    tracing::debug!(pending, "edits staged");
    let outcome = ui.spinning("Saving attendance", |ui| dashboard.save(ui))?;

    if ui_ctx.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&save_json(&outcome, ui.notices()))?
        );
    }

    match outcome {
        SaveOutcome::NothingToSave => Ok(()),
        SaveOutcome::Cancelled => Err(CliError::invalid_input(
            "Save cancelled: negative lesson balance not confirmed (pass --yes)",
        )
        .into()),
        SaveOutcome::Failed { message } => Err(CliError::server_failed(message).into()),
        SaveOutcome::Saved { response, .. } => {
            if ui_ctx.mode.is_json() || ctx.quiet() {
                return Ok(());
            }
            let date_label = dashboard.loaded_date().unwrap_or(date).to_string();
            let saved = pending.to_string();
            let rejected = response.rejected().count().to_string();
            print(
                &ui_ctx,
                &receipt(
                    &ui_ctx,
                    "Attendance saved",
                    &[
                        ("Date", date_label.as_str()),
                        ("Saved", saved.as_str()),
                        ("Rejected", rejected.as_str()),
                    ],
                ),
            );
            if ui_ctx.mode.is_pretty() {
                if let Some(roster) = dashboard.roster() {
                    blank_line(&ui_ctx);
                    print(&ui_ctx, &roster_table(&ui_ctx, roster));
                }
            }
            Ok(())
        }
    }
}
