//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use rollcall_core::status::status_label;
use rollcall_core::{EditLedger, Notice, Roster, RosterRow, Severity};

use super::context::UiContext;
use super::format::{signed, truncate};
use super::mode::OutputMode;
use super::theme::{
    modified_marker, negative_marker, severity_color, status_color, styled, styles, Badge,
};

/// Render a header line for a command.
///
/// Pretty mode: "Rollcall · command (context)"
/// Plain mode: "rollcall command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Rollcall", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("rollcall {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a summary block after an action.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Render a dashboard notice.
///
/// Plain mode: "notice=<level> <message>"
pub fn notice_line(ctx: &UiContext, notice: &Notice) -> String {
    let level = notice.level();
    if ctx.mode.is_pretty() {
        badge(ctx, Badge::for_notice(level), &notice.to_string())
    } else {
        let name = match level {
            rollcall_core::NoticeLevel::Info => "info",
            rollcall_core::NoticeLevel::Success => "success",
            rollcall_core::NoticeLevel::Warning => "warning",
            rollcall_core::NoticeLevel::Error => "error",
        };
        format!("notice={} {}", name, notice)
    }
}

const ROSTER_COLUMNS: [&str; 9] = [
    "", "ID", "Name", "Package", "Book", "Remaining", "Debt", "Status", "Extra",
];

/// Render a loaded roster.
///
/// Pretty mode: table with severity-colored name and balance cells and a
/// negative-balance marker beside the status. Without color the tier is
/// spelled out next to the balance.
/// Plain mode: one line per student, `id status remaining extra severity name`.
pub fn roster_table(ctx: &UiContext, roster: &Roster) -> String {
    if !ctx.mode.is_pretty() {
        return roster
            .rows()
            .iter()
            .map(plain_row)
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = Table::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = ROSTER_COLUMNS
        .iter()
        .map(|title| {
            let cell = Cell::new(title);
            if ctx.color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header_cells);

    for row in roster.rows() {
        table.add_row(pretty_row(ctx, row));
    }
    for index in [1, 5, 6, 8] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table.to_string()
}

fn pretty_row(ctx: &UiContext, row: &RosterRow) -> Vec<Cell> {
    let severity = if ctx.color {
        severity_color(row.state.severity)
    } else {
        None
    };
    let with_color = |cell: Cell, color: Option<comfy_table::Color>| match color {
        Some(c) => cell.fg(c),
        None => cell,
    };

    let marker = if row.is_modified() {
        modified_marker(ctx.unicode)
    } else {
        ""
    };
    let mut remaining = row.state.remaining_display();
    if !ctx.color && row.state.severity != Severity::Normal {
        remaining = format!("{} {}", remaining, row.state.severity.as_str());
    }
    let mut status = status_label(row.status).to_string();
    if row.state.negative_warning {
        status = format!("{} {}", status, negative_marker(ctx.unicode));
    }
    let status_fg = if !ctx.color {
        None
    } else if row.state.negative_warning {
        Some(comfy_table::Color::Red)
    } else {
        status_color(row.status)
    };

    vec![
        Cell::new(marker),
        Cell::new(row.id()),
        with_color(Cell::new(truncate(&row.record.display_name(), 40)), severity),
        Cell::new(row.record.package_label()),
        Cell::new(row.record.book_label()),
        with_color(Cell::new(remaining), severity),
        Cell::new(row.record.debt_display()),
        with_color(Cell::new(status), status_fg),
        Cell::new(signed(row.extra_lessons())),
    ]
}

fn plain_row(row: &RosterRow) -> String {
    let status = row.status.map(|s| s.code()).unwrap_or("none");
    let mut line = format!(
        "{} {} {} {} {} {}",
        row.id(),
        status,
        row.state.remaining_display(),
        signed(row.extra_lessons()),
        row.state.severity.as_str(),
        row.record.display_name()
    );
    if row.state.negative_warning {
        line.push_str(" negative");
    }
    line
}

/// List pending edits, one line each.
pub fn pending_lines(ctx: &UiContext, ledger: &EditLedger, roster: Option<&Roster>) -> String {
    if ledger.is_empty() {
        return if ctx.mode.is_pretty() {
            "No pending changes".to_string()
        } else {
            "pending=0".to_string()
        };
    }

    ledger
        .iter()
        .map(|(id, edit)| {
            let name = roster
                .and_then(|r| r.get(id))
                .map(|row| row.record.display_name())
                .unwrap_or_default();
            let status = edit
                .status
                .map(|s| s.label())
                .unwrap_or("(server status)");
            if ctx.mode.is_pretty() {
                format!(
                    "  {} {}  status: {}  extra: {}",
                    id,
                    name,
                    status,
                    signed(edit.extra_lessons)
                )
            } else {
                format!(
                    "{} {} {} {}",
                    id,
                    edit.status.map(|s| s.code()).unwrap_or("none"),
                    signed(edit.extra_lessons),
                    name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a message to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(h.to_string());
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h.trim_start_matches("Hint: ")));
        }
    }

    lines.join("\n")
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}
