//! Provider descriptor system.
//!
//! A descriptor holds the static configuration for one provider:
//! - Metadata (display name, CLI name, aliases)
//! - Backend route (path segment, load action)
//! - Authorization window title

use serde::Serialize;
use tether_core::{IntegrationRoute, ProviderKind};

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Complete descriptor for a provider.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display metadata.
    pub metadata: ProviderMetadata,
    /// Backend routing.
    pub route: IntegrationRoute,
    /// Title of the authorization window.
    pub window_title: String,
}

impl ProviderDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder(id: ProviderKind) -> ProviderDescriptorBuilder {
        ProviderDescriptorBuilder::new(id)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &str {
        &self.metadata.cli_name
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Display metadata for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    /// Name shown to users ("Hubspot").
    pub display_name: String,
    /// Lowercase name used on the command line.
    pub cli_name: String,
    /// Alternative CLI names.
    pub aliases: &'static [&'static str],
    /// One-line description.
    pub description: String,
}

impl ProviderMetadata {
    /// Default metadata derived from the provider kind.
    pub fn for_provider(kind: ProviderKind) -> Self {
        Self {
            display_name: kind.display_name().to_string(),
            cli_name: kind.cli_name().to_string(),
            aliases: kind.aliases(),
            description: String::new(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ProviderDescriptor`].
pub struct ProviderDescriptorBuilder {
    id: ProviderKind,
    metadata: Option<ProviderMetadata>,
    route: Option<IntegrationRoute>,
    window_title: Option<String>,
}

impl ProviderDescriptorBuilder {
    /// Creates a new builder for the given provider.
    pub fn new(id: ProviderKind) -> Self {
        Self {
            id,
            metadata: None,
            route: None,
            window_title: None,
        }
    }

    /// Sets the metadata.
    pub fn metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sets the backend route.
    pub fn route(mut self, route: IntegrationRoute) -> Self {
        self.route = Some(route);
        self
    }

    /// Sets the authorization window title.
    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = Some(title.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// Unset fields fall back to values derived from the provider kind: the
    /// route segment is the CLI name and the window is titled
    /// "{Display} Authorization".
    pub fn build(self) -> ProviderDescriptor {
        let id = self.id;
        ProviderDescriptor {
            id,
            metadata: self
                .metadata
                .unwrap_or_else(|| ProviderMetadata::for_provider(id)),
            route: self
                .route
                .unwrap_or_else(|| IntegrationRoute::new(id.cli_name())),
            window_title: self
                .window_title
                .unwrap_or_else(|| default_window_title(id)),
        }
    }
}

/// Window title used when a descriptor does not set one.
pub fn default_window_title(kind: ProviderKind) -> String {
    format!("{} Authorization", kind.display_name())
}
