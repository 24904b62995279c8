//! Cooperative handling of SIGINT/SIGTERM. Long running algorithms poll
//! [`received_ctrl_c`] and wrap up with their best known solution once it returns true.

use std::sync::atomic::{AtomicBool, Ordering};

static RECEIVED_SIGNAL: AtomicBool = AtomicBool::new(false);

/// Installs the signal handler. Has to be called at most once per process; failures to
/// install the handler are logged and otherwise ignored.
pub fn initialize() {
    if let Err(e) = ctrlc::set_handler(|| {
        RECEIVED_SIGNAL.store(true, Ordering::SeqCst);
    }) {
        log::warn!("Cannot install termination handler: {e}");
    }
}

pub fn received_ctrl_c() -> bool {
    RECEIVED_SIGNAL.load(Ordering::Relaxed)
}
