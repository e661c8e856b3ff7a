use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use rollcall_core::VERSION;

/// Rollcall - attendance dashboard for teachers, in your terminal
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "ROLLCALL_CONFIG")]
    pub config: Option<String>,

    /// Attendance server base URL (overrides config)
    #[arg(short, long, global = true, env = "ROLLCALL_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file
    Init(InitArgs),

    /// Show the roster for a date
    Roster(RosterArgs),

    /// Mark attendance and extra lessons, then save in one batch
    Mark(MarkArgs),

    /// Interactive attendance session
    Session(SessionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
///
/// The server URL comes from the global `--server` flag.
#[derive(Args)]
pub struct InitArgs {
    /// Earliest date rosters may be requested for (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub min_date: Option<String>,

    /// Timezone used to resolve "today" (e.g., Europe/Moscow)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Header that carries the anti-forgery token
    #[arg(long, value_name = "NAME")]
    pub csrf_header: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `roster` command
#[derive(Args)]
pub struct RosterArgs {
    /// Roster date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `mark` command
#[derive(Args)]
pub struct MarkArgs {
    /// Roster date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Set a status: ID=STATUS (present, late, absent, excused, none)
    #[arg(long, value_name = "ID=STATUS")]
    pub status: Vec<String>,

    /// Adjust extra lessons: ID=+N or ID=-N
    #[arg(long, value_name = "ID=N", allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `session` command
#[derive(Args)]
pub struct SessionArgs {
    /// Initial roster date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mark_accepts_negative_extra() {
        let cli = Cli::try_parse_from([
            "rollcall", "mark", "--date", "2025-12-03", "--extra", "4=-2", "--status", "4=late",
        ])
        .expect("should parse");
        match cli.command {
            Some(Commands::Mark(args)) => {
                assert_eq!(args.extra, vec!["4=-2".to_string()]);
                assert_eq!(args.status, vec!["4=late".to_string()]);
            }
            _ => panic!("expected mark command"),
        }
    }
}
