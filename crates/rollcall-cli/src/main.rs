//! Rollcall CLI - attendance dashboard for teachers
//!
//! Fetches a day's roster from the attendance server, collects attendance
//! marks and extra-lesson adjustments, and saves them in one batch.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod http;
mod logging;
mod output;
mod ui;

use clap::{CommandFactory, Parser};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, mark, misc, roster, session};
use crate::errors::CliError;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.no_color);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);

        match e.downcast_ref::<CliError>() {
            Some(CliError::NotFound { message, hint }) => {
                print_error(&ui_ctx, message, Some(hint));
            }
            _ => {
                let error_msg = format!("{}", e);
                let hint = extract_error_hint(&error_msg);
                print_error(&ui_ctx, &error_msg, hint.as_deref());
            }
        }

        let code = e
            .downcast_ref::<CliError>()
            .map(CliError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

/// Contextual hints for common failures.
fn extract_error_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("transport error") || error_lower.contains("connection") {
        return Some(
            "Hint: Check [server] base_url in the config or pass --server URL.".to_string(),
        );
    }

    if error_lower.contains("forbidden") || error_lower.contains("403") {
        return Some(
            "Hint: Set [server] session_cookie and ROLLCALL_CSRF_TOKEN for an authenticated session."
                .to_string(),
        );
    }

    if error_lower.contains("not on the loaded roster") {
        return Some("Hint: Run `rollcall roster` to list student IDs.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Roster(args)) => {
            roster::handle_roster(ctx, args)?;
        }
        Some(Commands::Mark(args)) => {
            mark::handle_mark(ctx, args)?;
        }
        Some(Commands::Session(args)) => {
            session::handle_session(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
