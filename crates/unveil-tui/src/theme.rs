//! Colours for each [`Mode`].
//!
//! Line and console styling are exhaustive matches on the closed kind enums;
//! no styling decision looks at line text.

use ratatui::style::{Color, Modifier, Style};
use unveil_core::console::Tone;
use unveil_core::prefs::Mode;
use unveil_core::render::ChipStatus;
use unveil_core::script::LineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub command: Color,
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub result: Color,
    pub error: Color,
}

const DARK: Palette = Palette {
    background: Color::Rgb(13, 17, 23),
    text: Color::Rgb(230, 237, 243),
    muted: Color::DarkGray,
    accent: Color::Cyan,
    command: Color::Rgb(126, 231, 135),
    success: Color::Green,
    info: Color::Rgb(121, 192, 255),
    warning: Color::Yellow,
    result: Color::Magenta,
    error: Color::Red,
};

const LIGHT: Palette = Palette {
    background: Color::Rgb(250, 250, 247),
    text: Color::Rgb(36, 41, 47),
    muted: Color::Gray,
    accent: Color::Blue,
    command: Color::Rgb(17, 99, 41),
    success: Color::Rgb(26, 127, 55),
    info: Color::Rgb(9, 105, 218),
    warning: Color::Rgb(154, 103, 0),
    result: Color::Rgb(130, 80, 223),
    error: Color::Rgb(207, 34, 46),
};

pub fn palette(mode: Mode) -> Palette {
    match mode {
        Mode::Dark => DARK,
        Mode::Light => LIGHT,
    }
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn line(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Command => Style::default()
                .fg(self.command)
                .add_modifier(Modifier::BOLD),
            LineKind::Success => Style::default().fg(self.success),
            LineKind::Info => Style::default().fg(self.info),
            LineKind::Warning => Style::default().fg(self.warning),
            LineKind::Result => Style::default()
                .fg(self.result)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::System => Style::default().fg(self.text),
            Tone::Echo => Style::default().fg(self.muted),
            Tone::Info => Style::default().fg(self.info),
            Tone::Success => Style::default().fg(self.success),
            Tone::Error => Style::default().fg(self.error),
        }
    }

    pub fn chip(&self, status: ChipStatus) -> Style {
        match status {
            ChipStatus::Current => Style::default()
                .fg(self.background)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD),
            ChipStatus::Completed => Style::default().fg(self.success),
            ChipStatus::Pending => Style::default().fg(self.muted),
        }
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
