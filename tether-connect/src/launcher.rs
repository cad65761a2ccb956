//! Opens a provider's authorization page.

use tether_core::SessionIdentity;
use tether_fetch::{FetchContext, WindowHandle};
use tether_providers::ProviderDescriptor;
use tracing::{debug, info, instrument, warn};

use crate::error::ConnectError;

/// Requests the authorization URL and opens it in a new window.
#[derive(Debug, Clone)]
pub struct AuthorizationLauncher {
    ctx: FetchContext,
}

impl AuthorizationLauncher {
    /// Creates a launcher over the given host APIs.
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    /// Launches the authorization flow.
    ///
    /// Produces at most one window. On a failed URL request no window is
    /// opened. `Ok(None)` means the host declined to give a handle; the
    /// caller treats that as an already-closed window.
    #[instrument(skip_all, fields(provider = %descriptor.id))]
    pub async fn launch(
        &self,
        identity: &SessionIdentity,
        descriptor: &ProviderDescriptor,
    ) -> Result<Option<Box<dyn WindowHandle>>, ConnectError> {
        let url = self
            .ctx
            .backend
            .authorize(&descriptor.route, identity)
            .await
            .map_err(ConnectError::Authorize)?;
        debug!(%url, "Opening authorization window");

        let handle = self
            .ctx
            .windows
            .open(&url, &descriptor.window_title, self.ctx.window_size)?;

        if handle.is_some() {
            info!("Authorization window opened");
        } else {
            warn!("Window host returned no handle");
        }
        Ok(handle)
    }
}
