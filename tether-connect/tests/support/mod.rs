//! Scripted backend and window host for state machine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tether_connect::WindowCompletionDetector;
use tether_core::{Credentials, IntegrationRoute, RetrievedSnapshot, SessionIdentity};
use tether_fetch::{
    BackendError, FetchContext, IntegrationBackend, WindowError, WindowHandle, WindowHost,
    WindowSize,
};
use url::Url;

// ============================================================================
// Backend
// ============================================================================

/// A canned backend response.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, Option<&'static str>),
}

impl Reply {
    fn into_result(self) -> Result<Value, BackendError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Status(status, detail) => Err(BackendError::Server {
                status,
                detail: detail.map(str::to_string),
            }),
        }
    }
}

/// Backend answering from scripted replies and recording every call.
#[derive(Debug)]
pub struct ScriptedBackend {
    authorize: Mutex<Reply>,
    credentials: Mutex<Reply>,
    load: Mutex<Reply>,
    calls: Mutex<Vec<String>>,
    load_bodies: Mutex<Vec<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            authorize: Mutex::new(Reply::Json(Value::String("https://auth.example/x".into()))),
            credentials: Mutex::new(Reply::Json(Value::Null)),
            load: Mutex::new(Reply::Json(Value::Array(Vec::new()))),
            calls: Mutex::new(Vec::new()),
            load_bodies: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_authorize(&self, reply: Reply) {
        *self.authorize.lock().unwrap() = reply;
    }

    pub fn on_credentials(&self, reply: Reply) {
        *self.credentials.lock().unwrap() = reply;
    }

    pub fn on_load(&self, reply: Reply) {
        *self.load.lock().unwrap() = reply;
    }

    /// Paths called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// `credentials` form values sent to load endpoints.
    pub fn load_bodies(&self) -> Vec<String> {
        self.load_bodies.lock().unwrap().clone()
    }

    fn record(&self, path: String) {
        self.calls.lock().unwrap().push(path);
    }
}

#[async_trait]
impl IntegrationBackend for ScriptedBackend {
    async fn authorize(
        &self,
        route: &IntegrationRoute,
        identity: &SessionIdentity,
    ) -> Result<Url, BackendError> {
        assert!(!identity.user_id().is_empty());
        self.record(route.authorize_path());
        let value = self.authorize.lock().unwrap().clone().into_result()?;
        let text = value
            .as_str()
            .ok_or_else(|| BackendError::InvalidResponse("not a string".into()))?;
        Url::parse(text).map_err(|e| BackendError::InvalidUrl(e.to_string()))
    }

    async fn credentials(
        &self,
        route: &IntegrationRoute,
        _identity: &SessionIdentity,
    ) -> Result<Value, BackendError> {
        self.record(route.credentials_path());
        self.credentials.lock().unwrap().clone().into_result()
    }

    async fn load(
        &self,
        route: &IntegrationRoute,
        credentials: &Credentials,
    ) -> Result<RetrievedSnapshot, BackendError> {
        self.record(route.load_path());
        self.load_bodies
            .lock()
            .unwrap()
            .push(credentials.to_json_string()?);
        let value = self.load.lock().unwrap().clone().into_result()?;
        Ok(RetrievedSnapshot::new(value))
    }
}

// ============================================================================
// Windows
// ============================================================================

/// How the next opened window behaves.
#[derive(Debug, Clone, Copy)]
pub enum WindowScript {
    /// Reports closed after this many open checks.
    ClosesAfter(usize),
    /// Never closes on its own.
    StaysOpen,
    /// The host returns no handle.
    NoHandle,
}

/// A window opened by [`ScriptedWindows`].
#[derive(Debug, Clone)]
pub struct OpenedWindow {
    pub url: String,
    pub title: String,
    pub size: WindowSize,
    pub checks: Arc<AtomicUsize>,
    pub closed_by_host: Arc<AtomicBool>,
}

#[derive(Debug)]
struct ScriptedWindow {
    open_checks: usize,
    checks: Arc<AtomicUsize>,
    closed_by_host: Arc<AtomicBool>,
}

impl WindowHandle for ScriptedWindow {
    fn is_closed(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst) >= self.open_checks
    }

    fn close(&self) {
        self.closed_by_host.store(true, Ordering::SeqCst);
    }
}

/// Window host following a script and recording every window.
#[derive(Debug)]
pub struct ScriptedWindows {
    script: Mutex<WindowScript>,
    opened: Mutex<Vec<OpenedWindow>>,
    open_calls: AtomicUsize,
}

impl ScriptedWindows {
    pub fn new(script: WindowScript) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            opened: Mutex::new(Vec::new()),
            open_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_script(&self, script: WindowScript) {
        *self.script.lock().unwrap() = script;
    }

    pub fn opened(&self) -> Vec<OpenedWindow> {
        self.opened.lock().unwrap().clone()
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }
}

impl WindowHost for ScriptedWindows {
    fn open(
        &self,
        url: &Url,
        title: &str,
        size: WindowSize,
    ) -> Result<Option<Box<dyn WindowHandle>>, WindowError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        let open_checks = match *self.script.lock().unwrap() {
            WindowScript::NoHandle => return Ok(None),
            WindowScript::ClosesAfter(n) => n,
            WindowScript::StaysOpen => usize::MAX,
        };

        let checks = Arc::new(AtomicUsize::new(0));
        let closed_by_host = Arc::new(AtomicBool::new(false));
        self.opened.lock().unwrap().push(OpenedWindow {
            url: url.to_string(),
            title: title.to_string(),
            size,
            checks: checks.clone(),
            closed_by_host: closed_by_host.clone(),
        });

        Ok(Some(Box::new(ScriptedWindow {
            open_checks,
            checks,
            closed_by_host,
        })))
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn context(backend: &Arc<ScriptedBackend>, windows: &Arc<ScriptedWindows>) -> FetchContext {
    FetchContext::new(backend.clone(), windows.clone())
}

pub fn identity() -> SessionIdentity {
    SessionIdentity::new("u1", "o1").unwrap()
}

pub fn fast_detector() -> WindowCompletionDetector {
    WindowCompletionDetector::new(Duration::from_millis(5))
}
