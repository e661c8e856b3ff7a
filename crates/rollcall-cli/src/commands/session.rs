//! Interactive attendance session.
//!
//! Reads one command per line from stdin and drives a [`Dashboard`] the way
//! the web dashboard's buttons and date picker would.

use std::io::{self, Write};
use std::str::FromStr;

use chrono::{Days, NaiveDate};

use rollcall_core::status::status_label;
use rollcall_core::{
    AttendanceApi, AttendanceStatus, Dashboard, DateOutcome, ExtraStep, LoadOutcome, RosterRow,
    SaveOutcome, StudentId,
};

use crate::app::AppContext;
use crate::cli::SessionArgs;
use crate::errors::CliError;
use crate::helpers::{parse_date, parse_status};
use crate::ui::format::signed;
use crate::ui::render::pending_lines;
use crate::ui::theme::negative_marker;
use crate::ui::{
    badge, blank_line, header, hint, print, print_error, roster_table, Badge, TerminalInteraction,
    UiContext,
};

use super::edit_error;

const HELP: &str = "\
Commands:
  show                      Show the roster
  pending                   List unsaved changes
  mark <id> <status>        Set status: present, late, absent, excused, none
  unmark <id>               Clear a pending status
  extra <id> <+|-|+N|-N>    Step extra lessons
  date <YYYY-MM-DD>         Switch date (asks before discarding changes)
  next | prev               Switch to the next or previous day
  reload                    Fetch the current date again
  save                      Save all pending changes in one batch
  help                      Show this help
  quit                      Leave (asks if changes are unsaved)";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Show,
    Pending,
    Mark(StudentId, Option<AttendanceStatus>),
    Extra(StudentId, i32),
    Date(NaiveDate),
    /// Move the selected date by whole days.
    Shift(i64),
    Reload,
    Save,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("show" | "ls", []) => Self::Show,
            ("pending", []) => Self::Pending,
            ("mark" | "m", [id, status]) => Self::Mark(parse_id(id)?, parse_status(status)?),
            ("unmark", [id]) => Self::Mark(parse_id(id)?, None),
            ("extra" | "x", [id, amount]) => Self::Extra(parse_id(id)?, parse_steps(amount)?),
            ("date" | "d", [date]) => Self::Date(parse_date(date)?),
            ("next", []) => Self::Shift(1),
            ("prev", []) => Self::Shift(-1),
            ("reload", []) => Self::Reload,
            ("save", []) => Self::Save,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => {
                return Err(CliError::invalid_input(format!(
                    "Unrecognized command: {} (type `help`)",
                    line.trim()
                ))
                .into())
            }
        };
        Ok(command)
    }
}

fn parse_id(value: &str) -> anyhow::Result<StudentId> {
    value
        .parse()
        .map_err(|_| CliError::invalid_input(format!("Invalid student ID: {}", value)).into())
}

/// "+" and "-" are single steps; "+3" and "-2" repeat.
fn parse_steps(value: &str) -> anyhow::Result<i32> {
    match value {
        "+" => Ok(1),
        "-" => Ok(-1),
        _ => value
            .strip_prefix('+')
            .unwrap_or(value)
            .parse::<i32>()
            .map_err(|_| CliError::invalid_input(format!("Invalid step: {}", value)).into()),
    }
}

enum Flow {
    Continue,
    Quit,
}

pub fn handle_session(ctx: &AppContext, args: &SessionArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let date = ctx.resolve_date(args.date.as_deref())?;
    let mut ui = TerminalInteraction::new(&ui_ctx, args.yes, ctx.quiet());
    let mut dashboard = Dashboard::new(ctx.api()?, ctx.settings()?);

    change_date(&ui_ctx, &mut dashboard, &mut ui, date);
    if !ctx.quiet() {
        print(&ui_ctx, &hint(&ui_ctx, "Type `help` for commands."));
    }

    let mut line = String::new();
    loop {
        prompt(&ui_ctx, &dashboard)?;
        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            if dashboard.has_unsaved_changes() {
                eprintln!(
                    "{}",
                    badge(
                        &ui_ctx,
                        Badge::Warn,
                        &format!(
                            "Input closed; discarding {} unsaved change(s)",
                            dashboard.ledger().len()
                        ),
                    )
                );
            }
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let outcome = line
            .trim()
            .parse::<SessionCommand>()
            .and_then(|command| execute(&ui_ctx, &mut dashboard, &mut ui, command));
        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => print_error(&ui_ctx, &err.to_string(), None),
        }
    }
    Ok(())
}

fn execute<A: AttendanceApi>(
    ui_ctx: &UiContext,
    dashboard: &mut Dashboard<A>,
    ui: &mut TerminalInteraction,
    command: SessionCommand,
) -> anyhow::Result<Flow> {
    match command {
        SessionCommand::Show => show(ui_ctx, dashboard),
        SessionCommand::Pending => {
            print(
                ui_ctx,
                &pending_lines(ui_ctx, dashboard.ledger(), dashboard.roster()),
            );
        }
        SessionCommand::Mark(student_id, status) => {
            let row = dashboard
                .set_status(student_id, status)
                .map_err(edit_error)?;
            print(ui_ctx, &describe_row(ui_ctx, row));
        }
        SessionCommand::Extra(student_id, amount) => {
            if amount == 0 {
                return Ok(Flow::Continue);
            }
            let step = if amount < 0 {
                ExtraStep::Decrement
            } else {
                ExtraStep::Increment
            };
            for _ in 1..amount.unsigned_abs() {
                dashboard.adjust_extra(student_id, step).map_err(edit_error)?;
            }
            let row = dashboard.adjust_extra(student_id, step).map_err(edit_error)?;
            print(ui_ctx, &describe_row(ui_ctx, row));
        }
        SessionCommand::Date(date) => change_date(ui_ctx, dashboard, ui, date),
        SessionCommand::Shift(days) => {
            let base = dashboard
                .selected_date()
                .or_else(|| dashboard.loaded_date())
                .ok_or(rollcall_core::RollcallError::NoDateLoaded)?;
            let target = if days >= 0 {
                base.checked_add_days(Days::new(days.unsigned_abs()))
            } else {
                base.checked_sub_days(Days::new(days.unsigned_abs()))
            }
            .ok_or_else(|| CliError::invalid_input("Date out of range"))?;
            change_date(ui_ctx, dashboard, ui, target);
        }
        SessionCommand::Reload => match dashboard.loaded_date() {
            Some(_) => {
                let outcome = ui.spinning("Reloading roster", |ui| dashboard.reload(ui));
                if let LoadOutcome::Loaded { .. } = outcome? {
                    show(ui_ctx, dashboard);
                }
            }
            None => {
                let date = dashboard
                    .selected_date()
                    .ok_or(rollcall_core::RollcallError::NoDateLoaded)?;
                change_date(ui_ctx, dashboard, ui, date);
            }
        },
        SessionCommand::Save => {
            let outcome = ui.spinning("Saving attendance", |ui| dashboard.save(ui));
            match outcome? {
                SaveOutcome::Saved { .. } => show(ui_ctx, dashboard),
                SaveOutcome::Cancelled => print(ui_ctx, "Save cancelled"),
                SaveOutcome::NothingToSave | SaveOutcome::Failed { .. } => {}
            }
        }
        SessionCommand::Help => print(ui_ctx, HELP),
        SessionCommand::Quit => {
            if dashboard.has_unsaved_changes() {
                let question = format!(
                    "{} unsaved change(s) will be lost. Quit anyway?",
                    dashboard.ledger().len()
                );
                if !ui.ask(&question) {
                    return Ok(Flow::Continue);
                }
            }
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

fn change_date<A: AttendanceApi>(
    ui_ctx: &UiContext,
    dashboard: &mut Dashboard<A>,
    ui: &mut TerminalInteraction,
    date: NaiveDate,
) {
    let outcome = ui.spinning("Loading roster", |ui| dashboard.select_date(date, ui));

    match outcome {
        DateOutcome::Load(LoadOutcome::Loaded { .. }) => show(ui_ctx, dashboard),
        DateOutcome::Load(LoadOutcome::TooEarly { min_date }) => print(
            ui_ctx,
            &hint(ui_ctx, &format!("Pick a date from {} on, or `reload`.", min_date)),
        ),
        DateOutcome::Declined { kept } => {
            let kept = kept
                .map(|d| d.to_string())
                .unwrap_or_else(|| "no date".to_string());
            print(ui_ctx, &format!("Staying on {}", kept));
        }
        DateOutcome::Load(LoadOutcome::Failed { .. }) | DateOutcome::Load(LoadOutcome::Stale) => {}
    }
}

fn show<A: AttendanceApi>(ui_ctx: &UiContext, dashboard: &Dashboard<A>) {
    let Some(roster) = dashboard.roster() else {
        print(ui_ctx, "No roster loaded; use `date YYYY-MM-DD`.");
        return;
    };
    let date_label = roster.date().to_string();
    blank_line(ui_ctx);
    print(ui_ctx, &header(ui_ctx, "session", Some(&date_label)));
    if roster.is_empty() {
        print(ui_ctx, "No students scheduled for this date");
    } else {
        print(ui_ctx, &roster_table(ui_ctx, roster));
    }
    if dashboard.has_unsaved_changes() {
        print(
            ui_ctx,
            &format!("{} unsaved change(s)", dashboard.ledger().len()),
        );
    }
}

fn describe_row(ui_ctx: &UiContext, row: &RosterRow) -> String {
    let mut line = format!(
        "{} {}: {}, extra {}, remaining {}",
        row.id(),
        row.record.display_name(),
        status_label(row.status),
        signed(row.extra_lessons()),
        row.state.remaining_display()
    );
    if row.state.negative_warning {
        line.push(' ');
        line.push_str(negative_marker(ui_ctx.unicode));
    }
    line
}

fn prompt<A: AttendanceApi>(ui_ctx: &UiContext, dashboard: &Dashboard<A>) -> io::Result<()> {
    if !ui_ctx.is_interactive() {
        return Ok(());
    }
    let date = dashboard
        .selected_date()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    let pending = dashboard.ledger().len();
    if pending > 0 {
        print!("rollcall {} [{} pending]> ", date, pending);
    } else {
        print!("rollcall {}> ", date);
    }
    io::stdout().flush()
}
