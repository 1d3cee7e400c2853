//! Command-line surface: `review`, `check` and `config`.

pub mod commands;
pub mod ui;

pub use commands::review::{OutputFormat, ReviewOptions, ReviewOutcome};
