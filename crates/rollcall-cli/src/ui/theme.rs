//! Colors, badges and severity styling.

use comfy_table::Color;
use owo_colors::{OwoColorize, Style};

use rollcall_core::{AttendanceStatus, NoticeLevel, Severity};

/// Apply a style when colors are enabled.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }

    pub fn success() -> Style {
        Style::new().green()
    }

    pub fn warning() -> Style {
        Style::new().yellow()
    }

    pub fn error() -> Style {
        Style::new().red().bold()
    }

    pub fn info() -> Style {
        Style::new().cyan()
    }
}

/// Status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
}

impl Badge {
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",
            (Self::Ok, false) => "[OK]",
            (Self::Warn, true) => "[\u{26A0}]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, true) => "[\u{2717}]",
            (Self::Err, false) => "[ERR]",
            (Self::Info, true) => "[\u{2139}]",
            (Self::Info, false) => "[INFO]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => styles::success(),
            Self::Warn => styles::warning(),
            Self::Err => styles::error(),
            Self::Info => styles::info(),
        }
    }

    pub fn for_notice(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => Self::Info,
            NoticeLevel::Success => Self::Ok,
            NoticeLevel::Warning => Self::Warn,
            NoticeLevel::Error => Self::Err,
        }
    }
}

/// Table color for a row's severity tier; `Normal` rows stay uncolored.
pub fn severity_color(severity: Severity) -> Option<Color> {
    match severity {
        Severity::Normal => None,
        Severity::Warn => Some(Color::Yellow),
        Severity::Low => Some(Color::Red),
        Severity::Debt => Some(Color::Magenta),
    }
}

pub fn status_color(status: Option<AttendanceStatus>) -> Option<Color> {
    match status {
        Some(AttendanceStatus::Present) => Some(Color::Green),
        Some(AttendanceStatus::Late) => Some(Color::Yellow),
        Some(AttendanceStatus::Absent) => Some(Color::Red),
        Some(AttendanceStatus::Excused) => Some(Color::Cyan),
        None => None,
    }
}

/// Marker appended to a row whose projected balance went negative.
pub fn negative_marker(unicode: bool) -> &'static str {
    if unicode {
        "\u{26A0} negative"
    } else {
        "! negative"
    }
}

/// Marker for rows carrying unsaved edits.
pub fn modified_marker(unicode: bool) -> &'static str {
    if unicode {
        "\u{25CF}"
    } else {
        "*"
    }
}

/// Spinner frames.
pub fn spinner_frames(unicode: bool) -> &'static [&'static str] {
    if unicode {
        &[
            "\u{280B}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283C}", "\u{2834}", "\u{2826}",
            "\u{2827}", "\u{2807}", "\u{280F}", "",
        ]
    } else {
        &["|", "/", "-", "\\", ""]
    }
}
