// main.rs

use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

mod app;
mod config;
mod models;
mod parser;
mod storage;
mod ui;

use app::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config();
    let data_dir = storage::data_dir(config.data_dir.as_deref());
    let tasks_path = data_dir.join(storage::TASKS_FILE);
    let position_path = data_dir.join(storage::POSITION_FILE);

    let mut list = storage::load_tasks(&tasks_path, &config.default_tasks)?;
    let position = storage::load_window_position(&position_path);

    // Catch resets that came due while the process was not running.
    if !list.evaluate(Local::now().naive_local()).is_empty() {
        storage::save_tasks(&list, &tasks_path)?;
    }

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let app = App::new(list, position, tasks_path);
    let res = ui::run_app(
        &mut terminal,
        app,
        Duration::from_secs(config.tick_seconds),
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match res {
        Ok(app) => {
            if let Err(err) = storage::save_window_position(app.position, &position_path) {
                eprintln!("Error saving window position: {}", err);
            }
        }
        Err(err) => eprintln!("Error: {:?}", err),
    }

    Ok(())
}
