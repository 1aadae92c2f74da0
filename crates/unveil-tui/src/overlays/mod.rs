//! Modal overlays. An open overlay receives every key until it closes.

pub mod console;

pub use console::ConsoleState;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use unveil_core::prefs::Persona;

use crate::theme::Palette;

pub enum Overlay {
    Console(ConsoleState),
}

/// What the reducer should do after an overlay handled a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayUpdate {
    pub close: bool,
    pub persona: Option<Persona>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn close() -> Self {
        Self {
            close: true,
            persona: None,
        }
    }

    #[must_use]
    pub fn with_persona(mut self, persona: Option<Persona>) -> Self {
        self.persona = persona;
        self
    }
}

impl Overlay {
    pub fn handle_key(&mut self, persona: Persona, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Console(console) => console.handle_key(persona, key),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self {
            Overlay::Console(console) => console.paste(text),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        match self {
            Overlay::Console(console) => console.render(frame, area, palette),
        }
    }
}

/// Centers a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}
