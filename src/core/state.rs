//! Process-wide shutdown state.
//!
//! Ctrl+C sets `SHUTDOWN` and notifies whoever registered a notifier. Before a
//! notifier is registered there is nothing to tear down, so the process exits.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

type Notifier = Box<dyn Fn() + Send + Sync>;

/// Callback run on Ctrl+C once a session is running
static NOTIFIER: OnceLock<Notifier> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(notify) = NOTIFIER.get() {
            crate::log!("relive"; "shutting down...");
            notify();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the callback that starts a graceful shutdown.
///
/// Only the first registration wins.
pub fn register_shutdown_notifier(notify: impl Fn() + Send + Sync + 'static) {
    let _ = NOTIFIER.set(Box::new(notify));
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Request shutdown without a signal (e.g. `q` on stdin).
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}
