// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tether Providers
//!
//! Static descriptors for every provider Tether can connect to.
//!
//! Each provider module contains a single descriptor: display metadata, the
//! backend route and the title of the authorization window. The connection
//! flow is driven entirely by the descriptor, so no code outside this crate
//! branches on provider identity.
//!
//! ## Supported Providers
//!
//! | Provider | Route segment | Load action |
//! |----------|---------------|-------------|
//! | Notion | `notion` | `load` |
//! | Airtable | `airtable` | `load` |
//! | Hubspot | `hubspot` | `get_hubspot_items` |
//!
//! ## Usage
//!
//! ```ignore
//! use tether_core::ProviderKind;
//! use tether_providers::ProviderRegistry;
//!
//! let desc = ProviderRegistry::get(ProviderKind::Hubspot).unwrap();
//! assert_eq!(desc.route.load_path(), "/integrations/hubspot/get_hubspot_items");
//! ```

pub mod descriptor;
pub mod registry;

// Provider modules (alphabetical)
pub mod airtable;
pub mod hubspot;
pub mod notion;

// Re-export key types
pub use descriptor::{ProviderDescriptor, ProviderDescriptorBuilder, ProviderMetadata};
pub use registry::ProviderRegistry;

// Re-export provider descriptors
pub use airtable::airtable_descriptor;
pub use hubspot::hubspot_descriptor;
pub use notion::notion_descriptor;
