use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use klipy_tray::tray::TrayState;
use klipy_tray::types::MediaItem;

use super::truncate;
use crate::app::App;

/// Items laid out as a grid of `columns` cells per row, scrolled so the
/// cursor stays visible.
pub fn render(frame: &mut Frame, app: &App, tray: &TrayState, area: Rect) {
    let title = tray
        .selected_tab
        .map(|tab| tab.to_string())
        .unwrap_or_else(|| "Tray".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", title, tray.items.len()));

    if tray.items.is_empty() {
        let message = if tray.is_loading {
            "Loading..."
        } else if tray.selected_tab.is_none() {
            "No tabs enabled"
        } else {
            "Nothing to show"
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = usize::from(tray.config.columns.max(2));
    let cell_width = (usize::from(inner.width) / columns).max(4);
    let visible_rows = usize::from(inner.height).max(1);
    let cursor_row = app.selected / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    let mut lines: Vec<Line> = tray
        .items
        .chunks(columns)
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
        .map(|(row, chunk)| {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, item)| cell(item, row * columns + col == app.selected, cell_width))
                .collect();
            Line::from(spans)
        })
        .collect();

    if tray.is_loading_more && lines.len() < visible_rows {
        lines.push(Line::from(Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow),
        )));
    } else if !tray.has_next
        && lines.len() < visible_rows
        && first_row + lines.len() == tray.items.len().div_ceil(columns)
    {
        lines.push(Line::from(Span::styled(
            "- end -",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn cell(item: &MediaItem, selected: bool, width: usize) -> Span<'static> {
    let mut label = item.label().to_string();
    if let Some((w, h)) = item.dimensions() {
        label = format!("{} {}x{}", label, w, h);
    }
    let text = format!("{:<width$}", truncate(&label, width - 1), width = width);

    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };
    Span::styled(text, style)
}
