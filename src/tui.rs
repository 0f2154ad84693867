use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, EventStream,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Key presses, pastes and render ticks. `next` is cancel safe, so it can sit in a
/// `select!` next to the tray's completions.
pub struct Events {
    reader: EventStream,
    render: Interval,
}

impl Events {
    pub fn new(render_rate: Duration) -> Self {
        let mut render = interval(render_rate);
        render.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            reader: EventStream::new(),
            render,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        loop {
            tokio::select! {
                _ = self.render.tick() => return Some(Event::Render),
                maybe = self.reader.next() => match maybe {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        return Some(Event::Key(key));
                    }
                    Some(Ok(CrosstermEvent::Paste(text))) => return Some(Event::Paste(text)),
                    Some(Ok(CrosstermEvent::Resize(..))) => return Some(Event::Render),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!("terminal input error: {}", e),
                    None => return None,
                },
            }
        }
    }
}
