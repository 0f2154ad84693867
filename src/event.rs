use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Terminal input the tray view reacts to. Resizes arrive as `Render`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Render,
    Key(KeyEvent),
    /// Bracketed paste, fed into the search line while editing.
    Paste(String),
}

impl Event {
    /// Ctrl+C quits from any mode, including while editing the search line.
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }

    /// Pasted text as a single search line: line breaks become spaces.
    pub fn paste_text(&self) -> Option<String> {
        match self {
            Event::Paste(text) => Some(
                text.split(['\r', '\n'])
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}
