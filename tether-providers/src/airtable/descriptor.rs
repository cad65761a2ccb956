//! Airtable provider descriptor.

use tether_core::{IntegrationRoute, ProviderKind};

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};

/// Builds the Airtable descriptor.
pub fn airtable_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Airtable,
        metadata: airtable_metadata(),
        route: IntegrationRoute::new("airtable"),
        window_title: "Airtable Authorization".to_string(),
    }
}

fn airtable_metadata() -> ProviderMetadata {
    ProviderMetadata {
        display_name: "Airtable".to_string(),
        cli_name: "airtable".to_string(),
        aliases: ProviderKind::Airtable.aliases(),
        description: "Bases and tables from Airtable".to_string(),
    }
}
