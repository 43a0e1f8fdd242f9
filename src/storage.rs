use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::{ReminderList, TaskRecord};
use crate::parser;

pub const TASKS_FILE: &str = "tasks.json";
pub const POSITION_FILE: &str = "window_position.json";

#[derive(Debug, Error)]
pub enum StorageError {
    // The save path only ever writes the fixed formats, so a bad time
    // string means the file was edited out from under us.
    #[error("stored task {name:?} has an invalid {field}: {source}")]
    InvalidTime {
        name: String,
        field: &'static str,
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

// On-disk record shape. Older files may lack either optional field.
#[derive(Debug, Deserialize)]
struct StoredTask {
    completed: bool,
    #[serde(default = "default_reset_time")]
    reset_time: String,
    #[serde(default)]
    last_completed_datetime: String,
}

fn default_reset_time() -> String {
    "00:00".to_string()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("reminder-tui"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_tasks(names: &[String]) -> ReminderList {
    ReminderList::new(names.iter().map(|name| TaskRecord::new(name.as_str())).collect())
}

/// Load the task collection. An absent or malformed file seeds the
/// default task set instead of failing; a present record whose time
/// strings do not parse is a contract violation and surfaces as an error.
pub fn load_tasks(path: &Path, default_names: &[String]) -> Result<ReminderList, StorageError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return Ok(default_tasks(default_names)),
    };
    let map: Map<String, Value> = match serde_json::from_str(&text) {
        Ok(map) => map,
        Err(_) => return Ok(default_tasks(default_names)),
    };

    let mut tasks = Vec::with_capacity(map.len());
    for (name, value) in map {
        let stored: StoredTask = match serde_json::from_value(value) {
            Ok(stored) => stored,
            Err(_) => return Ok(default_tasks(default_names)),
        };
        let reset_time =
            parser::parse_reset_time(&stored.reset_time).map_err(|source| {
                StorageError::InvalidTime {
                    name: name.clone(),
                    field: "reset_time",
                    source,
                }
            })?;
        let last_completed = if stored.last_completed_datetime.is_empty() {
            None
        } else {
            let parsed = parser::parse_datetime(&stored.last_completed_datetime).map_err(
                |source| StorageError::InvalidTime {
                    name: name.clone(),
                    field: "last_completed_datetime",
                    source,
                },
            )?;
            Some(parsed)
        };
        tasks.push(TaskRecord {
            name,
            completed: stored.completed,
            reset_time,
            last_completed,
        });
    }
    Ok(ReminderList::new(tasks))
}

/// Write the whole task mapping, keyed by name in display order.
pub fn save_tasks(list: &ReminderList, path: &Path) -> io::Result<()> {
    let mut map = Map::new();
    for task in list.tasks() {
        let last_completed = task
            .last_completed
            .map(parser::format_datetime)
            .unwrap_or_default();
        map.insert(
            task.name.clone(),
            json!({
                "completed": task.completed,
                "reset_time": parser::format_reset_time(task.reset_time),
                "last_completed_datetime": last_completed,
            }),
        );
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string(&Value::Object(map))?)
}

pub fn load_window_position(path: &Path) -> WindowPosition {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default()
}

pub fn save_window_position(position: WindowPosition, path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string(&position)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn default_names() -> Vec<String> {
        vec![
            "Task 1".to_string(),
            "Task 2".to_string(),
            "Task 3".to_string(),
        ]
    }

    fn populated_list() -> ReminderList {
        let mut water = TaskRecord::new("Water plants");
        water.completed = true;
        water.reset_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        water.last_completed = Some(
            NaiveDateTime::parse_from_str("2024-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        );
        let mut stretch = TaskRecord::new("Stretch");
        stretch.reset_time = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        ReminderList::new(vec![water, stretch, TaskRecord::new("Journal")])
    }

    #[test]
    fn test_round_trip_preserves_state_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        let list = populated_list();

        save_tasks(&list, &path).unwrap();
        let loaded = load_tasks(&path, &default_names()).unwrap();

        assert_eq!(loaded, list);
        let names: Vec<&str> = loaded.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Water plants", "Stretch", "Journal"]);
    }

    #[test]
    fn test_absent_file_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_tasks(&dir.path().join("absent.json"), &default_names()).unwrap();

        assert_eq!(loaded.len(), 3);
        for (task, name) in loaded.tasks().iter().zip(default_names()) {
            assert_eq!(task.name, name);
            assert!(!task.completed);
            assert_eq!(task.reset_time, NaiveTime::MIN);
            assert_eq!(task.last_completed, None);
        }
    }

    #[test]
    fn test_corrupt_file_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(&path, "not json at all").unwrap();

        let loaded = load_tasks(&path, &default_names()).unwrap();
        assert_eq!(loaded.len(), 3);
        assert!(loaded.get("Task 1").is_some());
    }

    #[test]
    fn test_wrong_record_shape_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(&path, r#"{"Water plants": {"completed": "yes"}}"#).unwrap();

        let loaded = load_tasks(&path, &default_names()).unwrap();
        assert_eq!(loaded.len(), 3);
        assert!(loaded.get("Task 2").is_some());
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(&path, r#"{"Water plants": {"completed": false}}"#).unwrap();

        let loaded = load_tasks(&path, &default_names()).unwrap();
        assert_eq!(loaded.len(), 1);
        let task = loaded.get("Water plants").unwrap();
        assert_eq!(task.reset_time, NaiveTime::MIN);
        assert_eq!(task.last_completed, None);
    }

    #[test]
    fn test_unparseable_time_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(
            &path,
            r#"{"Water plants": {"completed": false, "reset_time": "later"}}"#,
        )
        .unwrap();

        let err = load_tasks(&path, &default_names()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidTime { field: "reset_time", .. }
        ));

        fs::write(
            &path,
            r#"{"Water plants": {"completed": true, "last_completed_datetime": "yesterday"}}"#,
        )
        .unwrap();
        let err = load_tasks(&path, &default_names()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidTime {
                field: "last_completed_datetime",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_timestamp_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        fs::write(
            &path,
            r#"{"Stretch": {"completed": false, "reset_time": "06:30", "last_completed_datetime": ""}}"#,
        )
        .unwrap();

        let loaded = load_tasks(&path, &default_names()).unwrap();
        assert_eq!(loaded.get("Stretch").unwrap().last_completed, None);
    }

    #[test]
    fn test_window_position_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(POSITION_FILE);
        let position = WindowPosition { x: 42, y: 7 };

        save_window_position(position, &path).unwrap();
        assert_eq!(load_window_position(&path), position);
    }

    #[test]
    fn test_window_position_falls_back_to_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(POSITION_FILE);
        assert_eq!(load_window_position(&path), WindowPosition::default());

        fs::write(&path, "{broken").unwrap();
        assert_eq!(load_window_position(&path), WindowPosition::default());
    }
}
