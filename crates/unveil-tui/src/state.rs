//! Player state.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: Session       (controller + autoplay)
//! │   ├── prefs: Preferences     (mode, persona)
//! │   └── toast, now, flags
//! └── overlay: Option<Overlay>   (console)
//! ```
//!
//! The overlay sits beside `TuiState` so its key handler can borrow both.

use unveil_core::clock::Millis;
use unveil_core::config::Config;
use unveil_core::playback::Session;
use unveil_core::prefs::Preferences;
use unveil_core::script::Script;

use crate::overlays::Overlay;

/// How long a toast stays on the status line.
pub const TOAST_MS: u64 = 2000;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(script: Script, config: &Config, prefs: Preferences, autoplay: bool) -> Self {
        Self {
            tui: TuiState::new(script, config, prefs, autoplay),
            overlay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub until: Millis,
}

pub struct TuiState {
    pub session: Session,
    pub prefs: Preferences,
    pub show_tooltips: bool,
    /// Latest clock reading delivered by a tick.
    pub now: Millis,
    pub toast: Option<Toast>,
    /// Something visible changed since the last draw.
    pub dirty: bool,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(script: Script, config: &Config, prefs: Preferences, autoplay: bool) -> Self {
        let session = Session::new(script, config.timing.autoplay_interval_ms)
            .with_autoplay(autoplay);
        Self {
            session,
            prefs,
            show_tooltips: config.player.show_tooltips,
            now: Millis::ZERO,
            toast: None,
            dirty: true,
            should_quit: false,
        }
    }

    pub fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            text: text.into(),
            until: self.now + TOAST_MS,
        });
        self.dirty = true;
    }

    /// Earliest moment the loop has to wake up without input.
    pub fn next_wakeup(&self) -> Option<Millis> {
        let toast = self.toast.as_ref().map(|t| t.until);
        match (self.session.next_deadline(), toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
