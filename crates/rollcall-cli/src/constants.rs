//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config file, student on roster).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// The attendance server failed or rejected the request.
    pub const SERVER_FAILED: i32 = 5;
}

/// Environment variable holding the anti-forgery token.
pub const CSRF_TOKEN_ENV: &str = "ROLLCALL_CSRF_TOKEN";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "ROLLCALL_LOG";
