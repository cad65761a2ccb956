//! Notion provider.
//!
//! Uses the default backend routes under `/integrations/notion/`.

mod descriptor;

pub use descriptor::notion_descriptor;
