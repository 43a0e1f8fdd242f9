use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seconds between evaluation passes over the task list.
    pub tick_seconds: u64,
    /// Where tasks.json and window_position.json live; platform data dir
    /// when unset.
    pub data_dir: Option<PathBuf>,
    /// Names used to seed the list when no saved tasks exist.
    pub default_tasks: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_seconds: 60,
            data_dir: None,
            default_tasks: vec![
                "Task 1".to_string(),
                "Task 2".to_string(),
                "Task 3".to_string(),
            ],
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reminder-tui").join("config.toml"))
}

pub fn load_config() -> Config {
    let path = match config_path() {
        Some(path) => path,
        None => return Config::default(),
    };
    match fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(_) => Config::default(),
    }
}

fn parse_config(text: &str) -> Config {
    toml::from_str(text).unwrap_or_default()
}
