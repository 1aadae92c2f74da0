//! The `:` console overlay.

use std::mem;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unveil_core::console::{self, ConsoleAction, ConsoleLine};
use unveil_core::prefs::Persona;

use super::{OverlayUpdate, centered};
use crate::text::truncate_with_ellipsis;
use crate::theme::Palette;

const WIDTH: u16 = 72;
const HEIGHT: u16 = 20;
/// Older lines are dropped past this.
const MAX_LINES: usize = 200;

#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub input: String,
    pub lines: Vec<ConsoleLine>,
}

impl ConsoleState {
    pub fn open() -> Self {
        Self {
            input: String::new(),
            lines: console::banner(),
        }
    }

    pub fn handle_key(&mut self, persona: Persona, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Enter => self.submit(persona),
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.input.extend(text.chars().filter(|c| !c.is_control()));
    }

    fn submit(&mut self, persona: Persona) -> OverlayUpdate {
        let input = mem::take(&mut self.input);
        let reply = console::interpret(&input, persona);
        match reply.action {
            Some(ConsoleAction::Clear) => {
                self.lines = reply.lines;
                OverlayUpdate::stay()
            }
            Some(ConsoleAction::Exit) => {
                self.push_lines(reply.lines);
                OverlayUpdate::close()
            }
            Some(ConsoleAction::SetPersona(next)) => {
                self.push_lines(reply.lines);
                OverlayUpdate::stay().with_persona(Some(next))
            }
            None => {
                self.push_lines(reply.lines);
                OverlayUpdate::stay()
            }
        }
    }

    fn push_lines(&mut self, lines: Vec<ConsoleLine>) {
        self.lines.extend(lines);
        if self.lines.len() > MAX_LINES {
            let excess = self.lines.len() - MAX_LINES;
            self.lines.drain(..excess);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let popup = centered(area, WIDTH, HEIGHT);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .title(" Console ")
            .title_style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .style(palette.base());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let body_height = inner.height.saturating_sub(1) as usize;
        let skip = self.lines.len().saturating_sub(body_height);
        let mut lines: Vec<Line> = self
            .lines
            .iter()
            .skip(skip)
            .map(|line| {
                Line::from(Span::styled(
                    truncate_with_ellipsis(&line.text, width),
                    palette.tone(line.tone),
                ))
            })
            .collect();
        lines.resize(body_height, Line::default());
        lines.push(Line::from(vec![
            Span::styled("> ", palette.muted()),
            Span::styled(self.input.clone(), Style::default().fg(palette.text)),
            Span::styled("▌", Style::default().fg(palette.accent)),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
