//! Terminal detection for UI decisions.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// How a command should draw, resolved once from flags and environment.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// stdout is attached to a terminal
    pub is_tty: bool,
    pub color: bool,
    /// `--ascii` not given
    pub unicode: bool,
    pub mode: OutputMode,
}

impl UiContext {
    /// Color needs a terminal and is dropped by `--no-color`, `NO_COLOR`
    /// or `TERM=dumb`.
    pub fn from_env(json: bool, format: Option<&str>, no_color: bool, ascii: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let color_off = no_color || dumb || std::env::var_os("NO_COLOR").is_some();

        Self {
            is_tty,
            color: is_tty && !color_off,
            unicode: !ascii,
            mode: OutputMode::resolve(json, format, is_tty, dumb),
        }
    }

    /// Prompts need both ends attached to a terminal.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }

    /// Spinners draw on stderr, so stderr must be a terminal too.
    pub fn allows_animation(&self) -> bool {
        self.mode.is_pretty() && std::io::stderr().is_terminal()
    }
}
