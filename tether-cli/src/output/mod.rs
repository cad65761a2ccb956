//! Output formatting for CLI.

mod json;
mod text;

pub use json::{ConnectionReport, JsonFormatter};
pub use text::TextFormatter;
