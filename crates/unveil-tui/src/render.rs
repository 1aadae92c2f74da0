//! Pure drawing.
//!
//! Reads `&AppState`, builds the core [`PlaybackView`] and paints it. Never
//! mutates state or returns effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use unveil_core::playback::Phase;
use unveil_core::render::{self as view, PlaybackView};

use crate::state::AppState;
use crate::text::truncate_with_ellipsis;
use crate::theme::{Palette, palette};

const HEADER_HEIGHT: u16 = 3;
const CHIPS_HEIGHT: u16 = 1;
const PROGRESS_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

const KEY_HINTS: &str = "⏎ play  p pause  r reset  1-9/←→ stage  a auto  m mode  : console  q quit";

pub fn render(app: &AppState, frame: &mut Frame) {
    let state = &app.tui;
    let palette = palette(state.prefs.mode);
    let view = view::view(state.session.script(), state.session.state());
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let [header, chips, body, progress, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(CHIPS_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(PROGRESS_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(area);

    render_header(frame, header, &view, &palette);
    render_chips(frame, chips, &view, &palette);
    render_body(frame, body, &view, &palette, state.show_tooltips);
    render_progress(frame, progress, &view, &palette);
    render_status(frame, status, app, &view, &palette);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area, &palette);
    }
}

fn render_header(frame: &mut Frame, area: Rect, view: &PlaybackView, palette: &Palette) {
    let width = area.width.saturating_sub(2) as usize;
    let subtitle = view.subtitle.as_deref().unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.muted())
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let line = Line::from(Span::styled(
        truncate_with_ellipsis(subtitle, width),
        palette.muted(),
    ));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_chips(frame: &mut Frame, area: Rect, view: &PlaybackView, palette: &Palette) {
    let mut spans = vec![Span::raw(" ")];
    for chip in &view.chips {
        spans.push(Span::styled(
            format!(" {} {} {} ", chip.index + 1, chip.icon, chip.name),
            palette.chip(chip.status),
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    view: &PlaybackView,
    palette: &Palette,
    show_tooltips: bool,
) {
    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut last_stage = None;
    for entry in &view.history {
        if last_stage.is_some_and(|s| s != entry.stage) {
            lines.push(Line::default());
        }
        last_stage = Some(entry.stage);
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(&entry.text, width),
            palette.line(entry.kind),
        )));
        if show_tooltips && let Some(tooltip) = &entry.tooltip {
            lines.push(tooltip_line(tooltip, width, palette));
        }
    }

    if let Some(active) = &view.active {
        let mut spans = vec![Span::styled(
            truncate_with_ellipsis(&active.typed, width.saturating_sub(1)),
            palette.line(active.kind),
        )];
        if active.caret {
            spans.push(Span::styled(
                "▌",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        lines.push(Line::from(spans));
    }

    if show_tooltips && let Some(tooltip) = &view.tooltip {
        lines.push(tooltip_line(tooltip, width, palette));
    }

    if let Some(summary) = &view.summary {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(summary, width),
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if !view.results.is_empty() {
        let label_width = view
            .results
            .iter()
            .map(|m| m.label.chars().count())
            .max()
            .unwrap_or_default();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for metric in &view.results {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<label_width$}  ", metric.label),
                    palette.muted(),
                ),
                Span::styled(
                    metric.value.clone(),
                    Style::default()
                        .fg(palette.success)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }

    if view.phase == Phase::Idle {
        lines.push(Line::from(Span::styled(
            "Press Enter to start, : for the console, q to quit.",
            palette.muted(),
        )));
    }

    // Keep the newest lines in view.
    let height = inner.height as usize;
    let skip = lines.len().saturating_sub(height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn tooltip_line(tooltip: &str, width: usize, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        truncate_with_ellipsis(&format!("  ↳ {tooltip}"), width),
        palette.muted().add_modifier(Modifier::ITALIC),
    ))
}

fn render_progress(frame: &mut Frame, area: Rect, view: &PlaybackView, palette: &Palette) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.accent).bg(palette.background))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{}  {}%", view.counter, view.percent()));
    frame.render_widget(gauge, area);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    app: &AppState,
    view: &PlaybackView,
    palette: &Palette,
) {
    let state = &app.tui;
    let autoplay = if state.session.autoplay_wanted() {
        "auto"
    } else {
        "manual"
    };
    let left = format!(
        " {} · {} · {} · {} ",
        view.phase.label(),
        autoplay,
        state.prefs.mode,
        state.prefs.persona.label()
    );
    let right = match &state.toast {
        Some(toast) => toast.text.clone(),
        None => KEY_HINTS.to_string(),
    };
    let room = (area.width as usize).saturating_sub(left.chars().count() + 1);
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(palette.background).bg(palette.muted)),
        Span::raw(" "),
        Span::styled(truncate_with_ellipsis(&right, room), palette.muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
