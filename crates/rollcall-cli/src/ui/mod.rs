//! UI primitives for the Rollcall CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens, color styles, severity colors
//! - **Render**: Headers, key-values, hints, the roster table
//! - **Progress**: Spinner for server round-trips
//! - **Prompt**: Terminal front end for dashboard confirmations and notices
//! - **Format**: String utilities
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{UiContext, render::roster_table};
//!
//! let ctx = UiContext::from_env(args.json, args.format.as_deref(), cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "roster", Some("2025-12-03")));
//! println!("{}", roster_table(&ctx, &roster));
//! ```

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, roster_table,
};

pub use prompt::TerminalInteraction;
