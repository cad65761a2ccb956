//! Notion provider descriptor.

use tether_core::{IntegrationRoute, ProviderKind};

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};

/// Builds the Notion descriptor.
pub fn notion_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Notion,
        metadata: notion_metadata(),
        route: IntegrationRoute::new("notion"),
        window_title: "Notion Authorization".to_string(),
    }
}

fn notion_metadata() -> ProviderMetadata {
    ProviderMetadata {
        display_name: "Notion".to_string(),
        cli_name: "notion".to_string(),
        aliases: ProviderKind::Notion.aliases(),
        description: "Pages and databases from a Notion workspace".to_string(),
    }
}
