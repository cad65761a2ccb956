//! Airtable provider.
//!
//! Uses the default backend routes under `/integrations/airtable/`.

mod descriptor;

pub use descriptor::airtable_descriptor;
