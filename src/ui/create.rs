//! Camera registration form.

use ratatui::{prelude::*, widgets::*};

use crate::app::{CreateScreen, Field};

use super::{colors, draw_alert, draw_footer};

const FIELDS: [Field; 3] = [Field::Name, Field::CamIp, Field::VpsIp];

pub(super) fn draw(frame: &mut Frame, screen: &CreateScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),           // title
            Constraint::Length(1),           // alert
            Constraint::Length(3 * 3),       // three input fields
            Constraint::Length(1),           // sending indicator
            Constraint::Min(0),
            Constraint::Length(2),           // footer
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "Register camera",
        Style::default().fg(colors::ACCENT).bold(),
    )))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors::BORDER)),
    );
    frame.render_widget(title, chunks[0]);

    draw_alert(frame, chunks[1], screen.alert.as_deref());

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(chunks[2]);

    for (field, area) in FIELDS.into_iter().zip(field_areas.iter()) {
        draw_field(frame, *area, screen, field);
    }

    if screen.sending {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "registering…",
                Style::default().fg(colors::ACCENT),
            )),
            chunks[3],
        );
    }

    draw_footer(
        frame,
        chunks[5],
        &[
            ("tab", "next field"),
            ("enter", "register"),
            ("esc", "back"),
        ],
    );
}

fn draw_field(frame: &mut Frame, area: Rect, screen: &CreateScreen, field: Field) {
    let focused = screen.focus == field && !screen.sending;
    let border = if focused {
        Style::default().fg(colors::ACCENT)
    } else {
        Style::default().fg(colors::BORDER)
    };

    let mut value = Line::from(Span::styled(
        screen.field(field).to_string(),
        Style::default().fg(if screen.sending {
            colors::DIM
        } else {
            colors::TEXT
        }),
    ));
    if focused {
        value.push_span(Span::styled("▏", Style::default().fg(colors::ACCENT)));
    }

    let widget = Paragraph::new(value).block(
        Block::default()
            .title(Span::styled(field.label(), border))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    frame.render_widget(widget, area);
}
