//! JSON output for rosters and save results.

mod json;

pub use json::{roster_json, save_json};
