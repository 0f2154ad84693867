mod filters;
mod items;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use klipy_tray::tray::TrayState;

use crate::app::{App, InputMode};

pub fn render(frame: &mut Frame, app: &App, tray: &TrayState) {
    let mut constraints = vec![Constraint::Length(3)];
    if tray.config.show_categories {
        constraints.push(Constraint::Length(1));
    }
    if tray.config.show_search {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    render_tabs(frame, tray, take());
    if tray.config.show_categories {
        filters::render_chips(frame, tray, take());
    }
    if tray.config.show_search {
        filters::render_search(frame, app, tray, take());
    }
    items::render(frame, app, tray, take());
    render_status_bar(frame, app, tray, take());
}

fn render_tabs(frame: &mut Frame, tray: &TrayState, area: Rect) {
    let titles: Vec<String> = tray.tabs.iter().map(|tab| tab.to_string()).collect();
    let selected = tray
        .selected_tab
        .and_then(|tab| tray.tabs.iter().position(|t| *t == tab))
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                " klipy-tray ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, tray: &TrayState, area: Rect) {
    let status = if let Some(error) = &tray.error_message {
        Line::from(vec![
            Span::styled(format!("Error: {}", error), Style::default().fg(Color::Red)),
            Span::styled("  r: retry | e: dismiss", Style::default().fg(Color::Gray)),
        ])
    } else if tray.is_loading {
        Line::from(Span::styled("Loading...", Style::default().fg(Color::Yellow)))
    } else if tray.is_loading_more {
        Line::from(Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(notice) = &app.notice {
        Line::from(Span::styled(notice.as_str(), Style::default().fg(Color::Green)))
    } else {
        let help = match app.mode {
            InputMode::Search => "type to search | Enter: submit | Esc: cancel",
            InputMode::Normal => {
                "h/l: tabs | c/C: category | /: search | x: clear | j/k: nav | Enter: pick | o: open | q: quit"
            }
        };
        Line::from(Span::styled(help, Style::default().fg(Color::Gray)))
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Shorten `text` to `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
