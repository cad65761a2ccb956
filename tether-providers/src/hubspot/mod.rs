//! Hubspot provider.
//!
//! Hubspot is the one provider whose retrieval endpoint is not `load`:
//! items come from `POST /integrations/hubspot/get_hubspot_items`. The
//! override lives in the route, nowhere else.

mod descriptor;

pub use descriptor::{HUBSPOT_LOAD_ACTION, hubspot_descriptor};
