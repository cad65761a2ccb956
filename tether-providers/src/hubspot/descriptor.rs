//! Hubspot provider descriptor.

use tether_core::{IntegrationRoute, ProviderKind};

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};

/// Retrieval action on the Hubspot backend.
pub const HUBSPOT_LOAD_ACTION: &str = "get_hubspot_items";

/// Builds the Hubspot descriptor.
pub fn hubspot_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Hubspot,
        metadata: hubspot_metadata(),
        route: IntegrationRoute::new("hubspot").with_load_action(HUBSPOT_LOAD_ACTION),
        window_title: "Hubspot Authorization".to_string(),
    }
}

fn hubspot_metadata() -> ProviderMetadata {
    ProviderMetadata {
        display_name: "Hubspot".to_string(),
        cli_name: "hubspot".to_string(),
        aliases: ProviderKind::Hubspot.aliases(),
        description: "Contacts from HubSpot CRM".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hubspot_routes() {
        let desc = hubspot_descriptor();
        assert_eq!(desc.route.authorize_path(), "/integrations/hubspot/authorize");
        assert_eq!(desc.route.credentials_path(), "/integrations/hubspot/credentials");
        assert_eq!(desc.route.load_path(), "/integrations/hubspot/get_hubspot_items");
    }

    #[test]
    fn test_hubspot_window_title() {
        assert_eq!(hubspot_descriptor().window_title, "Hubspot Authorization");
    }
}
