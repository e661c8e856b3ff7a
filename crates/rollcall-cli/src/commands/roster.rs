use crate::app::AppContext;
use crate::cli::RosterArgs;
use crate::errors::CliError;
use crate::output::roster_json;
use crate::ui::{blank_line, header, hint, kv, print, roster_table, TerminalInteraction};

use super::open_dashboard;

const FORMATS: [&str; 3] = ["table", "plain", "json"];

pub fn handle_roster(ctx: &AppContext, args: &RosterArgs) -> anyhow::Result<()> {
    if let Some(format) = args.format.as_deref() {
        if !FORMATS.contains(&format) {
            return Err(CliError::invalid_input(format!(
                "Unknown format: {} (use {})",
                format,
                FORMATS.join(", ")
            ))
            .into());
        }
    }

    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    let date = ctx.resolve_date(args.date.as_deref())?;
    let mut ui = TerminalInteraction::new(&ui_ctx, false, ctx.quiet());
    let dashboard = open_dashboard(ctx, &mut ui, date)?;

    let Some(roster) = dashboard.roster() else {
        return Err(CliError::server_failed("Roster not loaded").into());
    };

    if ui_ctx.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&roster_json(roster, dashboard.ledger()))?
        );
        return Ok(());
    }

    let date_label = roster.date().to_string();
    print(&ui_ctx, &header(&ui_ctx, "roster", Some(&date_label)));
    if !ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &kv(&ui_ctx, "Date", &date_label));
        print(&ui_ctx, &kv(&ui_ctx, "Students", &roster.len().to_string()));
    }
    blank_line(&ui_ctx);

    if roster.is_empty() {
        print(&ui_ctx, "No students scheduled for this date");
        return Ok(());
    }
    print(&ui_ctx, &roster_table(&ui_ctx, roster));

    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        blank_line(&ui_ctx);
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!("rollcall mark --date {} --status ID=present", date_label),
            ),
        );
    }
    Ok(())
}
