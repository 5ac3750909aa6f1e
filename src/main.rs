use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;

use sysrec::app::App;
use sysrec::config::{self, load_config, load_config_from_path};
use sysrec::event::{Event, EventHandler};
use sysrec::logging::init_file_logging;
use sysrec::store::SessionStore;
use sysrec::ui;

#[derive(Parser)]
#[command(
    name = "sysrec",
    about = "TUI system monitor with recorded sampling sessions"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file (defaults to the platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Sampling period in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Display unit: B, KB, MB, GB, TB
    #[arg(long)]
    unit: Option<String>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(ref path) = cli.log_file {
        init_file_logging(path)?;
    }

    let config = load_config_for_cli(&cli);
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config::database_path(&config),
    };
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let store = SessionStore::open(&db_path)?;

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, store).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: config::Config,
    store: SessionStore,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(&config, store);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    app.on_tick();
                    should_draw = true;
                }
                Event::Resize => {
                    should_draw = true;
                }
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref unit) = cli.unit {
        config.general.default_unit = unit.clone();
    }

    config
}
