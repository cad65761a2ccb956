//! Provider registry.
//!
//! Static access to every provider descriptor. Adding a provider means
//! adding its module and one line in [`init_descriptors`].

use std::collections::HashMap;
use std::sync::OnceLock;
use tether_core::ProviderKind;
use tracing::debug;

use crate::airtable::airtable_descriptor;
use crate::descriptor::ProviderDescriptor;
use crate::hubspot::hubspot_descriptor;
use crate::notion::notion_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

static CLI_NAME_MAP: OnceLock<HashMap<String, ProviderKind>> = OnceLock::new();

/// Initializes all provider descriptors, in display order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    let descriptors = vec![
        notion_descriptor(),
        airtable_descriptor(),
        hubspot_descriptor(),
    ];
    debug!(count = descriptors.len(), "Provider registry initialized");
    descriptors
}

/// Builds the lowercase CLI name (and alias) to provider kind mapping.
fn build_cli_name_map(descriptors: &[ProviderDescriptor]) -> HashMap<String, ProviderKind> {
    let mut map = HashMap::new();

    for desc in descriptors {
        map.insert(desc.metadata.cli_name.to_ascii_lowercase(), desc.id);

        for alias in desc.metadata.aliases {
            map.insert(alias.to_ascii_lowercase(), desc.id);
        }
    }

    map
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of provider descriptors, initialized on first access.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Returns the CLI name to provider kind mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ProviderKind> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a provider by CLI name or alias, case-insensitively.
    ///
    /// Display names ("Hubspot") are accepted too, since they lowercase to
    /// the CLI name.
    pub fn get_by_cli_name(name: &str) -> Option<&'static ProviderDescriptor> {
        let kind = Self::cli_name_map().get(&name.trim().to_ascii_lowercase())?;
        Self::get(*kind)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider kinds.
    pub fn kinds() -> Vec<ProviderKind> {
        Self::all().iter().map(|d| d.id).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
