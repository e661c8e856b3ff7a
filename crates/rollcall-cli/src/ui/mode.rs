//! Output mode routing.

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// JSON document only
    Json,
    /// Stable `key=value` and space-separated lines for scripts
    #[default]
    Plain,
    /// Colored table output for a terminal
    Pretty,
}

impl OutputMode {
    /// Resolve the mode from flags and terminal state.
    ///
    /// `--json` wins. `--format plain` or `TERM=dumb` force plain. Otherwise
    /// pretty on a TTY and plain when piped; `--format table` does not force
    /// colors into a pipe.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag || format_flag == Some("json") {
            return Self::Json;
        }
        if format_flag == Some("plain") || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
