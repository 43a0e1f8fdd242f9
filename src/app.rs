use std::io;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

use crate::models::ReminderList;
use crate::parser;
use crate::storage::{self, WindowPosition};

pub struct App {
    pub list: ReminderList,
    pub state: ListState,
    pub input_mode: InputMode,
    pub time_input: String,
    pub position: WindowPosition,
    tasks_path: PathBuf,
}

pub enum InputMode {
    Normal,
    EditTime,
}

impl App {
    pub fn new(list: ReminderList, position: WindowPosition, tasks_path: PathBuf) -> App {
        let mut state = ListState::default();
        if !list.is_empty() {
            state.select(Some(0));
        } else {
            state.select(None);
        }
        App {
            list,
            state,
            input_mode: InputMode::Normal,
            time_input: String::new(),
            position,
            tasks_path,
        }
    }

    pub fn next(&mut self) {
        if self.list.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.list.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.list.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.list.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_name(&self) -> Option<String> {
        let index = self.state.selected()?;
        self.list.tasks().get(index).map(|task| task.name.clone())
    }

    fn persist(&self) {
        if let Err(err) = storage::save_tasks(&self.list, &self.tasks_path) {
            eprintln!("Error saving tasks: {}", err);
        }
    }

    /// Periodic evaluation pass; saves only when something was cleared.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if !self.list.evaluate(now).is_empty() {
            self.persist();
        }
    }

    pub fn toggle_selected(&mut self, now: NaiveDateTime) {
        let name = match self.selected_name() {
            Some(name) => name,
            None => return,
        };
        let target = match self.list.get(&name) {
            Some(task) => !task.completed,
            None => return,
        };
        match self.list.set_completed(&name, target, now) {
            Ok(true) => self.persist(),
            Ok(false) => {}
            Err(err) => eprintln!("Error updating task: {}", err),
        }
    }

    pub fn complete_all(&mut self, now: NaiveDateTime) {
        if !self.list.complete_all(now).is_empty() {
            self.persist();
        }
    }

    pub fn begin_time_edit(&mut self) {
        if let Some(index) = self.state.selected() {
            if let Some(task) = self.list.tasks().get(index) {
                self.time_input = parser::format_reset_time(task.reset_time);
                self.input_mode = InputMode::EditTime;
            }
        }
    }

    fn submit_time_edit(&mut self) {
        let name = match self.selected_name() {
            Some(name) => name,
            None => {
                self.input_mode = InputMode::Normal;
                return;
            }
        };
        // Invalid input keeps the editor open.
        if let Some(new_time) = parser::parse_time_input(&self.time_input) {
            match self.list.set_reset_time(&name, new_time) {
                Ok(true) => self.persist(),
                Ok(false) => {}
                Err(err) => eprintln!("Error updating reset time: {}", err),
            }
            self.time_input.clear();
            self.input_mode = InputMode::Normal;
        }
    }

    /// Move the checklist panel; clamping to the terminal happens at
    /// render time, the stored offset only stays non-negative.
    pub fn nudge(&mut self, dx: i32, dy: i32) {
        self.position.x = (self.position.x + dx).max(0);
        self.position.y = (self.position.y + dy).max(0);
    }

    pub fn handle_input(
        &mut self,
        key: crossterm::event::KeyEvent,
        now: NaiveDateTime,
    ) -> io::Result<bool> {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('j') => self.next(),
                KeyCode::Char('k') => self.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(now),
                KeyCode::Char('a') => self.complete_all(now),
                KeyCode::Char('e') => self.begin_time_edit(),
                KeyCode::Left => self.nudge(-2, 0),
                KeyCode::Right => self.nudge(2, 0),
                KeyCode::Up => self.nudge(0, -1),
                KeyCode::Down => self.nudge(0, 1),
                _ => {}
            },
            InputMode::EditTime => match key.code {
                KeyCode::Enter => self.submit_time_edit(),
                KeyCode::Esc => {
                    self.time_input.clear();
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Char(c) => {
                    if c.is_ascii_digit() || c == ':' {
                        self.time_input.push(c);
                    }
                }
                KeyCode::Backspace => {
                    self.time_input.pop();
                }
                _ => {}
            },
        }
        Ok(false)
    }
}
