mod config;
mod controller;
mod logging;
mod models;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::config::{default_config_path, load_config};
use crate::controller::QuoteController;
use crate::storage::{FileStore, KeyValueStore};
use crate::ui::{App, handle_key_event, render};

/// 提示过期检查的间隔
const TICK_RATE: Duration = Duration::from_millis(250);

fn main() -> io::Result<()> {
    let (config, config_warning) = load_config(default_config_path().as_deref());
    let data_dir = config.data_dir()?;

    if let Err(e) = logging::init(&data_dir, &config.log_filter) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Some(warning) = config_warning {
        tracing::warn!("{}", warning);
    }

    // 存储文件路径 (~/.local/share/quotegen/store.toml)
    let store_path = data_dir.join("store.toml");
    tracing::info!("Starting with store {}", store_path.display());

    let store = FileStore::open(&store_path);
    let mut app = App::new(QuoteController::new(store), &config);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Exited with error: {}", e);
    }
    tracing::info!("Quit with {} quotes", app.controller.quotes().len());

    result
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key_event(app, key.code) {
                    break;
                }
            }
        }

        app.tick(Local::now());
    }
    Ok(())
}
