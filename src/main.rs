mod app;
mod event;
mod tui;
mod ui;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use klipy_tray::config::{Config, API_KEY_ENV};
use klipy_tray::customer_id::CustomerIdProvider;
use klipy_tray::klipy::Klipy;
use klipy_tray::types::{MediaItem, Tab};
use klipy_tray::{FetchContext, MediaApi, TrayController};

use crate::app::{App, Command};
use crate::event::Event;
use crate::tui::Events;

#[derive(Debug, Parser)]
#[command(name = "klipy-tray", version, about = "Browse and pick GIFs, stickers, clips and memes")]
struct Cli {
    /// Klipy API key (defaults to the config file, then KLIPY_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Tab to open first: gifs, stickers, clips or memes
    #[arg(long)]
    tab: Option<Tab>,

    /// Locale sent with every request, e.g. en_US
    #[arg(long)]
    locale: Option<String>,

    /// Show category chips
    #[arg(long)]
    categories: bool,

    /// Show the recent feed when there is no search
    #[arg(long)]
    recents: bool,

    /// Report picks back to Klipy as shares
    #[arg(long)]
    share: bool,

    /// Use this customer id instead of the stored one
    #[arg(long)]
    customer_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);
    if config.client.api_key.trim().is_empty() {
        return Err(format!("no API key: pass --api-key or set {}", API_KEY_ENV).into());
    }

    let context = FetchContext {
        customer_id: CustomerIdProvider::resolve(cli.customer_id.as_deref()),
        locale: config.client.default_locale.clone(),
        per_page: config.client.default_per_page,
    };
    let api: Arc<dyn MediaApi> = Arc::new(Klipy::new(config.client)?);
    let tray = TrayController::new(api, config.tray, context).with_on_select(copy_to_clipboard);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(tray, cli.share).await;

    tui::restore()?;

    result
}

/// Config file and environment first, then command line overrides.
fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load();
    if let Some(key) = &cli.api_key {
        config.client.api_key = key.trim().to_string();
    }
    if let Some(locale) = &cli.locale {
        config.client.default_locale = Some(locale.clone());
    }
    if let Some(tab) = cli.tab {
        config.tray.initial_tab = tab;
    }
    if cli.categories {
        config.tray.show_categories = true;
    }
    if cli.recents {
        config.tray.show_recents = true;
    }
    config
}

async fn run(mut tray: TrayController, share: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;
    let mut app = App::new();
    let mut events = Events::new(Duration::from_millis(33));

    tray.bootstrap();

    loop {
        tokio::select! {
            maybe = events.next() => {
                let Some(event) = maybe else { break };
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        app.sync(tray.state());
                        terminal.draw(|frame| ui::render(frame, &app, tray.state()))?;
                    }
                    event => {
                        let command = app.handle_event(event, tray.state());
                        apply(command, &mut tray, &mut app, share);
                    }
                }
            }
            _ = tray.next(), if tray.has_pending() => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn apply(command: Command, tray: &mut TrayController, app: &mut App, share: bool) {
    match command {
        Command::None => {}
        Command::Quit => app.should_quit = true,
        Command::Tray(action) => tray.dispatch(action),
        Command::Pick(item) => {
            tray.select_item(&item);
            if share {
                tray.share_item(&item);
            }
            app.notice = Some(format!("Picked {}", item.label()));
        }
        Command::Open(item) => {
            app.notice = Some(match item.share_url() {
                Some(url) => match open::that(url) {
                    Ok(()) => format!("Opened {}", item.label()),
                    Err(e) => format!("Could not open {}: {}", url, e),
                },
                None => "This item has no URL".to_string(),
            });
        }
    }
}

fn copy_to_clipboard(item: &MediaItem) {
    let Some(url) = item.share_url() else {
        tracing::warn!(id = %item.id, "picked item has no URL to copy");
        return;
    };
    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url));
    if let Err(e) = copied {
        tracing::warn!("could not copy {} to clipboard: {}", url, e);
    }
}
