//! Ctrl+C handling so a blocking `wait` can be abandoned cleanly.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been pressed since the handler was registered.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reset the interrupt flag (for testing or re-use).
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Register the Ctrl+C handler.
///
/// Only one handler can exist per process; a second registration is logged
/// and otherwise ignored.
pub fn register_handler() {
    if let Err(e) = ctrlc::set_handler(move || {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }) {
        debug!("Ctrl+C handler not installed: {}", e);
    }
}
