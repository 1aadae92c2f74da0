//! Process-wide Ctrl+C state.
//!
//! The handler only flips a flag and wakes waiters. Whoever owns playback
//! observes the flag, cancels its controller synchronously and exits with
//! status 130. A second Ctrl+C exits immediately after running the restore
//! hook.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::sync::Notify;

/// Exit status for a run cut short by Ctrl+C.
pub const EXIT_INTERRUPTED: i32 = 130;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INTERRUPT_NOTIFY: OnceLock<Notify> = OnceLock::new();
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Interrupted")]
pub struct InterruptedError;

/// Installs the Ctrl+C handler.
///
/// # Errors
/// Returns an error if a handler is already registered.
pub fn init() -> Result<()> {
    ctrlc::set_handler(trigger_ctrl_c).context("Error setting Ctrl+C handler")
}

fn notify() -> &'static Notify {
    INTERRUPT_NOTIFY.get_or_init(Notify::new)
}

/// Records an interrupt, force-exiting on the second one.
pub fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // process::exit skips Drop, so put the terminal back first.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(EXIT_INTERRUPTED);
    }
    notify().notify_waiters();
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Fails with [`InterruptedError`] once Ctrl+C has been pressed.
pub fn check() -> Result<(), InterruptedError> {
    if is_interrupted() {
        Err(InterruptedError)
    } else {
        Ok(())
    }
}

/// Resolves once an interrupt is triggered.
pub async fn wait_for_interrupt() {
    loop {
        let notified = notify().notified();
        if is_interrupted() {
            return;
        }
        notified.await;
    }
}

pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Registers the hook run before a forced exit. Only the first call counts.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}
