//! Rendering. One draw function per screen, composed from the shared
//! pieces below; nothing in here mutates state.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Screen};

mod create;
mod history;
mod list;

pub mod colors {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(255, 193, 37);
    pub const TEXT: Color = Color::Rgb(253, 246, 227);
    pub const DIM: Color = Color::Rgb(147, 161, 161);
    pub const BORDER: Color = Color::Rgb(88, 110, 117);
    pub const ONLINE: Color = Color::Rgb(133, 153, 0);
    pub const OFFLINE: Color = Color::Rgb(220, 50, 47);
    pub const SERIES: Color = Color::Rgb(108, 113, 196);
}

pub fn draw(frame: &mut Frame, app: &App) {
    match &app.screen {
        Screen::List(screen) => list::draw(frame, screen),
        Screen::Create(screen) => create::draw(frame, screen),
        Screen::History(screen) => history::draw(frame, screen),
    }
}

/// Online/offline badge; `None` renders as offline, matching how the
/// original treated an unknown state.
pub(crate) fn status_badge(online: Option<bool>) -> Span<'static> {
    match online {
        Some(true) => Span::styled("● connected", Style::default().fg(colors::ONLINE)),
        _ => Span::styled("○ offline", Style::default().fg(colors::OFFLINE)),
    }
}

/// The alert region every screen shares. Empty when there is nothing to
/// report, red and prefixed when there is.
pub(crate) fn draw_alert(frame: &mut Frame, area: Rect, alert: Option<&str>) {
    let line = match alert {
        Some(message) => Line::from(vec![
            Span::styled("error: ", Style::default().fg(colors::OFFLINE).bold()),
            Span::styled(message.to_string(), Style::default().fg(colors::TEXT)),
        ]),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub(crate) fn draw_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, action) in hints {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Black).bg(colors::DIM),
        ));
        spans.push(Span::styled(
            format!(" {action} "),
            Style::default().fg(colors::DIM),
        ));
        spans.push(Span::raw(" "));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors::BORDER)),
    );
    frame.render_widget(footer, area);
}

pub(crate) fn loading_line(what: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("loading {what}…"),
        Style::default().fg(colors::ACCENT),
    ))
}
