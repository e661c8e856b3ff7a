//! Parsing helper functions for the CLI.
//!
//! Dates and the `ID=VALUE` edit assignments taken by `mark`.

mod parsing;

pub use parsing::{parse_date, parse_extra_assignment, parse_status, parse_status_assignment};
