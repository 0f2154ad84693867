use crossterm::event::{KeyCode, KeyEvent};

use klipy_tray::action::Action;
use klipy_tray::tray::TrayState;
use klipy_tray::types::{Category, MediaItem, Tab};

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// What the main loop should do in response to a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Quit,
    Tray(Action),
    Pick(MediaItem),
    Open(MediaItem),
}

/// View-local state. Tray data lives in the controller; this only tracks
/// the cursor, the search line being edited, and transient notices.
#[derive(Debug, Default)]
pub struct App {
    pub mode: InputMode,
    pub selected: usize,
    pub search_input: String,
    /// Search text to restore when editing is cancelled.
    search_before_edit: String,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: Event, tray: &TrayState) -> Command {
        if let Some(text) = event.paste_text() {
            return self.handle_paste(&text);
        }
        match event {
            Event::Key(key) => self.handle_key(key, tray),
            Event::Render | Event::Paste(_) => Command::None,
        }
    }

    fn handle_paste(&mut self, text: &str) -> Command {
        if self.mode != InputMode::Search || text.is_empty() {
            return Command::None;
        }
        self.search_input.push_str(text);
        Command::Tray(Action::ChangeSearchText(self.search_input.clone()))
    }

    fn handle_key(&mut self, key: KeyEvent, tray: &TrayState) -> Command {
        if self.mode == InputMode::Search {
            return self.handle_search_key(key);
        }

        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Tab | KeyCode::Char('l') => self.switch_tab(tray, 1),
            KeyCode::BackTab | KeyCode::Char('h') => self.switch_tab(tray, -1),
            KeyCode::Char('c') => self.cycle_category(tray, true),
            KeyCode::Char('C') => self.cycle_category(tray, false),
            KeyCode::Char('/') if tray.config.show_search => {
                self.mode = InputMode::Search;
                self.search_input = tray.search_text.clone();
                self.search_before_edit = tray.search_text.clone();
                Command::None
            }
            KeyCode::Char('x') => {
                self.selected = 0;
                self.search_input.clear();
                Command::Tray(Action::ClearSearch)
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_down(tray),
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Command::None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                Command::None
            }
            KeyCode::Enter => self.current(tray).cloned().map_or(Command::None, Command::Pick),
            KeyCode::Char('o') => self.current(tray).cloned().map_or(Command::None, Command::Open),
            KeyCode::Char('r') => Command::Tray(Action::Retry),
            KeyCode::Char('e') => Command::Tray(Action::DismissError),
            _ => Command::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                self.selected = 0;
                Command::Tray(Action::SubmitSearch)
            }
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.search_input = std::mem::take(&mut self.search_before_edit);
                Command::Tray(Action::ChangeSearchText(self.search_input.clone()))
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Command::Tray(Action::ChangeSearchText(self.search_input.clone()))
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Command::Tray(Action::ChangeSearchText(self.search_input.clone()))
            }
            _ => Command::None,
        }
    }

    fn switch_tab(&mut self, tray: &TrayState, step: isize) -> Command {
        let Some(next) = step_tab(&tray.tabs, tray.selected_tab, step) else {
            return Command::None;
        };
        self.selected = 0;
        Command::Tray(Action::SelectTab(next))
    }

    fn cycle_category(&mut self, tray: &TrayState, forward: bool) -> Command {
        if tray.categories.is_empty() {
            return Command::None;
        }
        self.selected = 0;
        let next = step_category(&tray.categories, tray.selected_category.as_ref(), forward);
        Command::Tray(Action::SelectCategory(next))
    }

    /// Moving onto the last item asks for the next page; the tray ignores
    /// the request when nothing more can load.
    fn move_down(&mut self, tray: &TrayState) -> Command {
        let Some(last) = tray.items.len().checked_sub(1) else {
            return Command::None;
        };
        self.selected = (self.selected + 1).min(last);
        if self.selected == last && tray.can_load_more() {
            Command::Tray(Action::LoadNextPage)
        } else {
            Command::None
        }
    }

    fn current<'a>(&self, tray: &'a TrayState) -> Option<&'a MediaItem> {
        tray.items.get(self.selected)
    }

    /// Keep the cursor inside the item list after the tray replaced it.
    pub fn sync(&mut self, tray: &TrayState) {
        self.selected = self.selected.min(tray.items.len().saturating_sub(1));
        if self.mode == InputMode::Normal {
            self.search_input.clone_from(&tray.search_text);
        }
    }
}

fn step_tab(tabs: &[Tab], current: Option<Tab>, step: isize) -> Option<Tab> {
    if tabs.is_empty() {
        return None;
    }
    let len = tabs.len() as isize;
    let index = current
        .and_then(|tab| tabs.iter().position(|t| *t == tab))
        .map_or(0, |i| (i as isize + step).rem_euclid(len));
    tabs.get(index as usize).copied()
}

/// Chips cycle through every category and then back to "none selected".
fn step_category(
    categories: &[Category],
    current: Option<&Category>,
    forward: bool,
) -> Option<Category> {
    let position = current.and_then(|c| categories.iter().position(|x| x == c));
    let next = match (position, forward) {
        (None, true) => Some(0),
        (None, false) => categories.len().checked_sub(1),
        (Some(i), true) => (i + 1 < categories.len()).then_some(i + 1),
        (Some(i), false) => i.checked_sub(1),
    };
    next.and_then(|i| categories.get(i)).cloned()
}
