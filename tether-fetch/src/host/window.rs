//! Detached authorization windows.
//!
//! The provider's consent screen runs in a window Tether does not control.
//! The only signal it gives back is that it went away, so a handle exposes
//! exactly that: [`WindowHandle::is_closed`].
//!
//! ## Hosts
//!
//! - [`BrowserWindowHost`]: launches a Chromium-family browser in app mode
//!   with a fresh profile per window, so the window is a child process whose
//!   exit means "closed"
//! - [`PromptWindowHost`]: prints the URL and waits for the user to confirm
//!   on stdin, for terminals without a usable browser

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use crate::error::WindowError;

// ============================================================================
// Traits
// ============================================================================

/// Size of an authorization window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

/// A window opened by a [`WindowHost`].
pub trait WindowHandle: Send + Sync + fmt::Debug {
    /// Returns true once the window is gone. Never flips back.
    fn is_closed(&self) -> bool;

    /// Closes the window if it is still open.
    fn close(&self);
}

/// Opens top-level windows for authorization flows.
pub trait WindowHost: Send + Sync {
    /// Opens `url` in a new window.
    ///
    /// `Ok(None)` means the host accepted the request but produced no
    /// window (for instance a blocked popup); callers treat that as a
    /// window that is already closed.
    fn open(
        &self,
        url: &Url,
        title: &str,
        size: WindowSize,
    ) -> Result<Option<Box<dyn WindowHandle>>, WindowError>;
}

// ============================================================================
// Browser Window Host
// ============================================================================

/// Browsers that support `--app` windows, in lookup order.
const APP_MODE_BROWSERS: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "microsoft-edge",
    "brave-browser",
];

/// macOS bundles checked when nothing is on `PATH`.
#[cfg(target_os = "macos")]
const MACOS_BROWSER_BUNDLES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Opens authorization pages as dedicated browser app windows.
#[derive(Debug, Clone, Default)]
pub struct BrowserWindowHost {
    browser: Option<PathBuf>,
    profile_root: Option<PathBuf>,
}

impl BrowserWindowHost {
    /// Creates a host that looks the browser up on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific browser executable.
    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<PathBuf>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    /// Creates per-window profiles under `dir` instead of the cache dir.
    #[must_use]
    pub fn with_profile_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_root = Some(dir.into());
        self
    }

    /// Finds the browser executable.
    pub fn resolve_browser(&self) -> Result<PathBuf, WindowError> {
        if let Some(ref browser) = self.browser {
            return which::which(browser).map_err(|_| {
                WindowError::BrowserNotFound(browser.display().to_string())
            });
        }

        if let Some(path) = APP_MODE_BROWSERS
            .iter()
            .find_map(|name| which::which(name).ok())
        {
            return Ok(path);
        }

        #[cfg(target_os = "macos")]
        if let Some(path) = MACOS_BROWSER_BUNDLES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            return Ok(path);
        }

        Err(WindowError::BrowserNotFound(APP_MODE_BROWSERS.join(", ")))
    }

    /// Creates a profile directory owned by one window.
    ///
    /// Chromium hands a launch on a profile that is already in use to the
    /// running process and exits at once, which would read as a closed
    /// window. A fresh directory per launch keeps every window its own process.
    fn fresh_profile(&self) -> io::Result<TempDir> {
        let root = self.profile_root.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("tether")
        });
        std::fs::create_dir_all(&root)?;
        tempfile::Builder::new()
            .prefix("auth-window-")
            .tempdir_in(root)
    }
}

impl WindowHost for BrowserWindowHost {
    #[instrument(skip(self, url), fields(title = %title))]
    fn open(
        &self,
        url: &Url,
        title: &str,
        size: WindowSize,
    ) -> Result<Option<Box<dyn WindowHandle>>, WindowError> {
        let browser = self.resolve_browser()?;
        let profile = self.fresh_profile()?;

        debug!(
            browser = %browser.display(),
            profile = %profile.path().display(),
            "Launching authorization window"
        );

        let child = Command::new(&browser)
            .arg(format!("--app={url}"))
            .arg(format!("--window-size={},{}", size.width, size.height))
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        info!(pid = child.id(), "Authorization window opened");
        Ok(Some(Box::new(ProcessWindow::new(child, profile))))
    }
}

/// A browser window backed by a child process.
///
/// The profile directory is removed when the handle is dropped.
#[derive(Debug)]
pub struct ProcessWindow {
    child: Mutex<Child>,
    closed: AtomicBool,
    profile: TempDir,
}

impl ProcessWindow {
    fn new(child: Child, profile: TempDir) -> Self {
        Self {
            child: Mutex::new(child),
            closed: AtomicBool::new(false),
            profile,
        }
    }

    /// Profile directory this window runs on.
    pub fn profile_dir(&self) -> &Path {
        self.profile.path()
    }
}

impl WindowHandle for ProcessWindow {
    fn is_closed(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return true;
        }

        let exited = match self.child.lock() {
            Ok(mut child) => match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(status = %status, "Authorization window exited");
                    true
                }
                Ok(None) => false,
                Err(e) => {
                    warn!(error = %e, "Cannot query authorization window, assuming closed");
                    true
                }
            },
            Err(_) => true,
        };

        if exited {
            self.closed.store(true, Ordering::Release);
        }
        exited
    }

    fn close(&self) {
        if self.is_closed() {
            return;
        }
        if let Ok(mut child) = self.child.lock() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "Failed to close authorization window");
            }
            // Reap without blocking; a child still exiting is left to the OS.
            if let Ok(None) = child.try_wait() {
                trace!(pid = child.id(), "Authorization window still exiting");
            }
        }
        self.closed.store(true, Ordering::Release);
    }
}

// ============================================================================
// Prompt Window Host
// ============================================================================

/// Confirmation lines read from the user.
///
/// One reader thread serves every window of a host, started on the first
/// `open`. Each line is one confirmation; end of input disconnects the
/// channel, which every waiting window takes as closed.
struct Confirmations {
    input: Option<Box<dyn BufRead + Send>>,
    lines: Option<Receiver<()>>,
}

impl Confirmations {
    /// Starts the reader thread if needed, and drops confirmations that
    /// arrived while no window was waiting for one.
    fn listen(&mut self) -> io::Result<()> {
        if let Some(lines) = &self.lines {
            let stale = lines.try_iter().count();
            if stale > 0 {
                debug!(stale, "Discarded confirmations typed before the window opened");
            }
            return Ok(());
        }

        let Some(mut input) = self.input.take() else {
            return Ok(());
        };
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("tether-prompt".to_string())
            .spawn(move || {
                let mut line = String::new();
                loop {
                    line.clear();
                    match input.read_line(&mut line) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {
                            if tx.send(()).is_err() {
                                break;
                            }
                        }
                    }
                }
            })?;
        self.lines = Some(rx);
        Ok(())
    }

    /// Takes one confirmation if there is one. End of input counts.
    fn take(&self) -> bool {
        match self.lines.as_ref().map(Receiver::try_recv) {
            Some(Ok(()) | Err(TryRecvError::Disconnected)) | None => true,
            Some(Err(TryRecvError::Empty)) => false,
        }
    }
}

/// Asks the user to open the URL themselves and confirm when done.
///
/// The window counts as closed once a line is read from the input.
#[derive(Clone)]
pub struct PromptWindowHost {
    confirmations: Arc<Mutex<Confirmations>>,
}

impl PromptWindowHost {
    /// Creates a host reading confirmations from stdin.
    pub fn new() -> Self {
        Self::with_input(io::BufReader::new(io::stdin()))
    }

    /// Creates a host reading confirmations from `input`.
    pub fn with_input(input: impl BufRead + Send + 'static) -> Self {
        Self {
            confirmations: Arc::new(Mutex::new(Confirmations {
                input: Some(Box::new(input)),
                lines: None,
            })),
        }
    }
}

impl Default for PromptWindowHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PromptWindowHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptWindowHost").finish_non_exhaustive()
    }
}

impl WindowHost for PromptWindowHost {
    fn open(
        &self,
        url: &Url,
        title: &str,
        _size: WindowSize,
    ) -> Result<Option<Box<dyn WindowHandle>>, WindowError> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{title}: open this URL in your browser to continue:")?;
        writeln!(stderr, "\n  {url}\n")?;
        writeln!(stderr, "Press Enter once the authorization page is closed.")?;

        match self.confirmations.lock() {
            Ok(mut confirmations) => confirmations.listen()?,
            Err(_) => return Ok(None),
        }

        Ok(Some(Box::new(PromptWindow {
            confirmations: Arc::clone(&self.confirmations),
            closed: AtomicBool::new(false),
        })))
    }
}

/// Window handle confirmed by user input.
///
/// Only a window that is still open takes a confirmation, so a window closed
/// by the host never swallows the line meant for the next one.
pub struct PromptWindow {
    confirmations: Arc<Mutex<Confirmations>>,
    closed: AtomicBool,
}

impl fmt::Debug for PromptWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptWindow")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl WindowHandle for PromptWindow {
    fn is_closed(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return true;
        }
        let confirmed = self
            .confirmations
            .lock()
            .map_or(true, |confirmations| confirmations.take());
        if confirmed {
            self.closed.store(true, Ordering::Release);
        }
        confirmed
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_closed(handle: &dyn WindowHandle) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if handle.is_closed() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    /// Input fed line by line from the test. Ends when the sender is dropped.
    struct FedInput {
        rx: mpsc::Receiver<Vec<u8>>,
        pending: Vec<u8>,
    }

    impl io::Read for FedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pending.is_empty() {
                match self.rx.recv() {
                    Ok(bytes) => self.pending = bytes,
                    Err(_) => return Ok(0),
                }
            }
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }
    }

    fn fed_host() -> (PromptWindowHost, mpsc::Sender<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        let input = FedInput {
            rx,
            pending: Vec::new(),
        };
        (PromptWindowHost::with_input(io::BufReader::new(input)), tx)
    }

    fn auth_url() -> Url {
        Url::parse("https://auth.example/x").unwrap()
    }

    #[test]
    fn test_default_size() {
        let size = WindowSize::default();
        assert_eq!((size.width, size.height), (600, 600));
    }

    #[test]
    fn test_prompt_window_closes_on_input() {
        let host = PromptWindowHost::with_input(io::Cursor::new(b"\n".to_vec()));

        let handle = host
            .open(&auth_url(), "Notion Authorization", WindowSize::default())
            .unwrap()
            .unwrap();

        assert!(wait_closed(handle.as_ref()));
    }

    #[test]
    fn test_prompt_window_close() {
        let (host, _tx) = fed_host();
        let handle = host.open(&auth_url(), "t", WindowSize::default()).unwrap().unwrap();

        assert!(!handle.is_closed());
        handle.close();
        assert!(handle.is_closed());
    }

    #[test]
    fn test_prompt_closed_window_leaves_confirmation_for_next() {
        let (host, tx) = fed_host();

        let first = host.open(&auth_url(), "t", WindowSize::default()).unwrap().unwrap();
        first.close();

        let second = host.open(&auth_url(), "t", WindowSize::default()).unwrap().unwrap();
        assert!(!second.is_closed());

        tx.send(b"\n".to_vec()).unwrap();
        assert!(wait_closed(second.as_ref()));

        // One line closes one window
        let third = host.open(&auth_url(), "t", WindowSize::default()).unwrap().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(!third.is_closed());
    }

    #[test]
    fn test_prompt_end_of_input_closes_window() {
        let (host, tx) = fed_host();
        let handle = host.open(&auth_url(), "t", WindowSize::default()).unwrap().unwrap();

        drop(tx);
        assert!(wait_closed(handle.as_ref()));
    }

    #[test]
    fn test_missing_browser_override() {
        let host = BrowserWindowHost::new().with_browser("definitely-not-a-browser-binary");
        assert!(matches!(
            host.resolve_browser(),
            Err(WindowError::BrowserNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_browser_windows_get_separate_profiles() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let log = dir.path().join("profiles.log");
        let script = dir.path().join("fake-browser");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nfor arg in \"$@\"; do\n  case \"$arg\" in --user-data-dir=*) echo \"${{arg#--user-data-dir=}}\" >> '{}';; esac\ndone\nexec sleep 30\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let host = BrowserWindowHost::new()
            .with_browser(&script)
            .with_profile_root(dir.path().join("profiles"));

        let first = host.open(&auth_url(), "Notion Authorization", WindowSize::default()).unwrap().unwrap();
        let second = host.open(&auth_url(), "Hubspot Authorization", WindowSize::default()).unwrap().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let profiles = loop {
            let logged = std::fs::read_to_string(&log).unwrap_or_default();
            let lines: Vec<String> = logged.lines().map(str::to_string).collect();
            if lines.len() >= 2 || Instant::now() > deadline {
                break lines;
            }
            std::thread::sleep(Duration::from_millis(10));
        };

        assert_eq!(profiles.len(), 2);
        assert_ne!(profiles[0], profiles[1]);
        assert!(!first.is_closed());
        assert!(!second.is_closed());

        first.close();
        second.close();
        assert!(first.is_closed());
        assert!(second.is_closed());
    }
}
