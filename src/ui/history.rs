//! History screen: occupancy line chart, pager control and sample table
//! for one camera.

use ratatui::symbols::Marker;
use ratatui::{prelude::*, widgets::*};

use crate::app::HistoryScreen;
use crate::series;

use super::{colors, draw_alert, draw_footer, status_badge};

pub(super) fn draw(frame: &mut Frame, screen: &HistoryScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),      // title
            Constraint::Length(1),      // alert
            Constraint::Percentage(45), // chart
            Constraint::Length(1),      // pager bar
            Constraint::Min(5),         // table
            Constraint::Length(2),      // footer
        ])
        .split(frame.area());

    draw_title(frame, chunks[0], screen);
    draw_alert(frame, chunks[1], screen.alert.as_deref());
    draw_chart(frame, chunks[2], screen);
    draw_pager_bar(frame, chunks[3], screen);
    draw_table(frame, chunks[4], screen);
    draw_footer(
        frame,
        chunks[5],
        &[
            ("←/→", "page"),
            ("1-5", "jump"),
            ("s", "page size"),
            ("r", "refresh"),
            ("esc", "back"),
            ("q", "quit"),
        ],
    );
}

fn draw_title(frame: &mut Frame, area: Rect, screen: &HistoryScreen) {
    let mut spans = vec![
        Span::styled(
            format!("History — {}", screen.camera),
            Style::default().fg(colors::ACCENT).bold(),
        ),
        Span::raw("  "),
        status_badge(screen.online),
    ];
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

fn draw_chart(frame: &mut Frame, area: Rect, screen: &HistoryScreen) {
    let block = Block::default()
        .title(Span::styled(
            " OCCUPANCY ",
            Style::default().fg(colors::TEXT).bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER));

    let points = series::chart_points(&screen.samples);
    if points.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "no chart data",
                Style::default().fg(colors::DIM),
            )),
            inner,
        );
        return;
    }

    let x_bounds = series::x_bounds(&points);
    let y_bounds = series::y_bounds(&points);

    let x_labels: Vec<Span> = series::x_labels(x_bounds)
        .into_iter()
        .map(|label| Span::styled(label, Style::default().fg(colors::DIM)))
        .collect();
    let y_labels: Vec<Span> = series::y_labels(y_bounds)
        .into_iter()
        .map(|label| Span::styled(label, Style::default().fg(colors::DIM)))
        .collect();

    let datasets = vec![Dataset::default()
        .name("occupancy")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colors::SERIES))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds(x_bounds)
                .labels(x_labels)
                .style(Style::default().fg(colors::BORDER)),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(y_labels)
                .style(Style::default().fg(colors::BORDER)),
        );

    frame.render_widget(chart, area);
}

fn draw_pager_bar(frame: &mut Frame, area: Rect, screen: &HistoryScreen) {
    let current = screen.pager.page_index();
    let mut spans = vec![Span::styled("page ", Style::default().fg(colors::DIM))];

    // Pages display 1-based, like the original pager buttons.
    for page in screen.pager.window() {
        if page == current {
            spans.push(Span::styled(
                format!("[{}]", page + 1),
                Style::default().fg(colors::ACCENT).bold(),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", page + 1),
                Style::default().fg(colors::TEXT),
            ));
        }
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        format!("· {} per page", screen.pager.page_size()),
        Style::default().fg(colors::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_table(frame: &mut Frame, area: Rect, screen: &HistoryScreen) {
    let block = Block::default()
        .title(Span::styled(
            " SAMPLES ",
            Style::default().fg(colors::TEXT).bold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER));

    let rows: Vec<Row> = series::table_rows(&screen.samples)
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(Span::styled(row.time, Style::default().fg(colors::TEXT))),
                Cell::from(Span::styled(row.amount, Style::default().fg(colors::TEXT))),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
        .header(
            Row::new(vec![
                Cell::from(Span::styled(
                    "TIME",
                    Style::default().fg(colors::ACCENT).bold(),
                )),
                Cell::from(Span::styled(
                    "PEOPLE",
                    Style::default().fg(colors::ACCENT).bold(),
                )),
            ])
            .bottom_margin(1),
        )
        .block(block);

    frame.render_widget(table, area);
}
