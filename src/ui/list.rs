//! Camera list screen: the directory table with per-row status and the
//! actions that operate on the selected camera.

use ratatui::{prelude::*, widgets::*};

use crate::app::ListScreen;

use super::{colors, draw_alert, draw_footer, loading_line, status_badge};

pub(super) fn draw(frame: &mut Frame, screen: &ListScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1), // alert
            Constraint::Min(5),    // table
            Constraint::Length(2), // footer
        ])
        .split(frame.area());

    draw_title(frame, chunks[0], screen);
    draw_alert(frame, chunks[1], screen.alert.as_deref());
    draw_table(frame, chunks[2], screen);
    draw_footer(
        frame,
        chunks[3],
        &[
            ("↑/↓", "select"),
            ("enter", "history"),
            ("a", "add"),
            ("t", "toggle"),
            ("d", "delete"),
            ("r", "refresh"),
            ("q", "quit"),
        ],
    );
}

fn draw_title(frame: &mut Frame, area: Rect, screen: &ListScreen) {
    let mut spans = vec![Span::styled(
        "Occupancy Meter Dashboard",
        Style::default().fg(colors::ACCENT).bold(),
    )];
    if screen.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "refreshing…",
            Style::default().fg(colors::DIM),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors::BORDER)),
    );
    frame.render_widget(title, area);
}

fn draw_table(frame: &mut Frame, area: Rect, screen: &ListScreen) {
    let block = Block::default()
        .title(Span::styled(" CAMERAS ", Style::default().fg(colors::TEXT).bold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER));

    if screen.loading && screen.cameras.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(loading_line("cameras")), inner);
        return;
    }

    let rows: Vec<Row> = if screen.cameras.is_empty() {
        vec![Row::new(vec![
            Cell::from(Span::styled("no data", Style::default().fg(colors::DIM))),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
        ])]
    } else {
        screen
            .cameras
            .iter()
            .map(|camera| {
                let status = status_cell(screen, camera.name.as_str(), camera.is_online);
                Row::new(vec![
                    Cell::from(Span::styled(
                        camera.name.clone(),
                        Style::default().fg(colors::TEXT),
                    )),
                    Cell::from(Span::styled(
                        camera.cam_ip.clone(),
                        Style::default().fg(colors::DIM),
                    )),
                    Cell::from(Span::styled(
                        camera.vps_ip.clone(),
                        Style::default().fg(colors::DIM),
                    )),
                    Cell::from(status),
                ])
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(vec![
            header_cell("NAME"),
            header_cell("CAMERA IP"),
            header_cell("VPS IP"),
            header_cell("STATUS"),
        ])
        .bottom_margin(1),
    )
    .block(block)
    .row_highlight_style(Style::default().bg(colors::BORDER))
    .highlight_symbol("▸ ");

    let mut state = TableState::default().with_selected(Some(screen.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn header_cell(label: &str) -> Cell<'_> {
    Cell::from(Span::styled(label, Style::default().fg(colors::ACCENT).bold()))
}

fn status_cell(screen: &ListScreen, name: &str, is_online: bool) -> Span<'static> {
    if let Some((pending, action)) = &screen.pending_status {
        if pending == name {
            return Span::styled(
                action.in_flight_label(),
                Style::default().fg(colors::ACCENT),
            );
        }
    }
    if screen.pending_delete.as_deref() == Some(name) {
        return Span::styled("removing…", Style::default().fg(colors::ACCENT));
    }
    status_badge(Some(is_online))
}
