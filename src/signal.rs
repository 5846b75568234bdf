//! Ctrl+C handling.
//!
//! A single [`ShutdownHandler`] owns an `Arc<AtomicBool>`. The flag is handed
//! to [`FinderConfig::with_shutdown_flag`](crate::duplicates::FinderConfig::with_shutdown_flag),
//! and the walker checks it before visiting each child. Once set, the running
//! scan ends with `FinderError::Interrupted` and the process exits with 130.
//!
//! ```rust,no_run
//! use namedupe::duplicates::{DuplicateFinder, FinderConfig};
//! use namedupe::signal::install_handler;
//!
//! let handler = install_handler().expect("signal handler");
//! let finder = DuplicateFinder::new(
//!     FinderConfig::default().with_shutdown_flag(handler.get_flag()),
//! );
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag by hand.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the underlying flag, for the finder and walker.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can serve another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: Mutex<Option<ShutdownHandler>> = Mutex::new(None);

/// Hook Ctrl+C to a process-wide [`ShutdownHandler`].
///
/// `ctrlc` accepts one handler per process. The first call installs it;
/// later calls (e.g. several `run_app` invocations in one test binary) get
/// the same handler back with its flag cleared. Concurrent first calls are
/// serialized, so exactly one hook is registered.
///
/// # Errors
///
/// Returns `SignalError::InstallFailed` if `ctrlc` refuses the hook, for
/// example because another component registered one first.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let mut installed = GLOBAL_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(ref handler) = *installed {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted, stopping scan...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    })?;

    log::debug!("Ctrl+C handler installed");
    *installed = Some(handler.clone());
    Ok(handler)
}
