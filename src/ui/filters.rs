use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use klipy_tray::tray::TrayState;

use crate::app::{App, InputMode};

/// Category chips; the selected one is highlighted.
pub fn render_chips(frame: &mut Frame, tray: &TrayState, area: Rect) {
    if tray.categories.is_empty() {
        let empty = Paragraph::new(" no categories").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let mut spans = vec![Span::raw(" ")];
    for category in &tray.categories {
        let style = if tray.selected_category.as_ref() == Some(category) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", category.display_name), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_search(frame: &mut Frame, app: &App, tray: &TrayState, area: Rect) {
    let editing = app.mode == InputMode::Search;
    let mut spans = vec![Span::styled(
        " / ",
        Style::default().fg(if editing { Color::Yellow } else { Color::Cyan }),
    )];

    if editing {
        spans.push(Span::raw(app.search_input.as_str()));
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled("search", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(app.search_input.as_str()));
    }

    if let Some(query) = &tray.last_committed_query {
        spans.push(Span::styled(
            format!("   showing \"{}\"", query),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
