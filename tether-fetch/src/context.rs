//! Fetch context bundling the host APIs.
//!
//! The connection flow receives one context and reaches the backend and the
//! window host through it, so tests can swap either side.

use std::sync::Arc;

use crate::backend::IntegrationBackend;
use crate::host::window::{WindowHost, WindowSize};

// ============================================================================
// Fetch Context
// ============================================================================

/// Shared handles to the backend and the window host.
#[derive(Clone)]
pub struct FetchContext {
    /// Integration backend.
    pub backend: Arc<dyn IntegrationBackend>,
    /// Host for authorization windows.
    pub windows: Arc<dyn WindowHost>,
    /// Size of authorization windows.
    pub window_size: WindowSize,
}

impl FetchContext {
    /// Creates a context from its parts.
    pub fn new(backend: Arc<dyn IntegrationBackend>, windows: Arc<dyn WindowHost>) -> Self {
        Self {
            backend,
            windows,
            window_size: WindowSize::default(),
        }
    }

    /// Creates a builder.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::default()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("window_size", &self.window_size)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    backend: Option<Arc<dyn IntegrationBackend>>,
    windows: Option<Arc<dyn WindowHost>>,
    window_size: WindowSize,
}

impl FetchContextBuilder {
    /// Sets the backend.
    #[must_use]
    pub fn backend(mut self, backend: impl IntegrationBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Sets a shared backend.
    #[must_use]
    pub fn shared_backend(mut self, backend: Arc<dyn IntegrationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the window host.
    #[must_use]
    pub fn windows(mut self, windows: impl WindowHost + 'static) -> Self {
        self.windows = Some(Arc::new(windows));
        self
    }

    /// Sets a shared window host.
    #[must_use]
    pub fn shared_windows(mut self, windows: Arc<dyn WindowHost>) -> Self {
        self.windows = Some(windows);
        self
    }

    /// Sets the authorization window size.
    #[must_use]
    pub fn window_size(mut self, size: WindowSize) -> Self {
        self.window_size = size;
        self
    }

    /// Builds the context.
    ///
    /// Missing parts default to the local HTTP backend and the browser host.
    pub fn build(self) -> Result<FetchContext, crate::error::BackendError> {
        let backend = match self.backend {
            Some(backend) => backend,
            None => Arc::new(crate::backend::HttpBackend::local()?),
        };
        let windows = self
            .windows
            .unwrap_or_else(|| Arc::new(crate::host::window::BrowserWindowHost::new()));

        Ok(FetchContext {
            backend,
            windows,
            window_size: self.window_size,
        })
    }
}
