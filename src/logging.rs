//! Stderr diagnostics for vendor traffic.
//!
//! Off by default. Hosts embedding the adapters opt in with [`set_verbose`]
//! to see base-URL resolution, retry attempts, and backoff delays. Output
//! goes to stderr so it never mixes with result envelopes.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

const BLUE_RGB: (u8, u8, u8) = (95, 175, 255);
const ORANGE_RGB: (u8, u8, u8) = (255, 160, 80);

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Toggle diagnostic output for the whole process.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::SeqCst);
}

/// Whether diagnostic output is currently enabled.
#[must_use]
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print an informational diagnostic. No-op unless verbosity is on.
pub fn info(message: impl AsRef<str>) {
    if is_verbose() {
        let (r, g, b) = BLUE_RGB;
        eprintln!("{} {}", "info".truecolor(r, g, b).bold(), message.as_ref());
    }
}

/// Print a warning diagnostic (retryable failures). No-op unless verbosity is on.
pub fn warn(message: impl AsRef<str>) {
    if is_verbose() {
        let (r, g, b) = ORANGE_RGB;
        eprintln!("{} {}", "warn".truecolor(r, g, b).bold(), message.as_ref());
    }
}
