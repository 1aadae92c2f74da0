//! Effects returned by the reducer.
//!
//! The reducer only mutates state; file writes and leaving the loop are
//! carried out by the runtime.

use unveil_core::prefs::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Leave the event loop.
    Quit,

    /// Save the colour mode to the prefs file.
    PersistMode { mode: Mode },
}
