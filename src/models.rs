use chrono::{Duration, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task: {0}")]
    UnknownTask(String),
}

// One checklist item. The completion timestamp is set exactly when the
// task transitions to completed and cleared exactly when it leaves it.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRecord {
    pub name: String,
    pub completed: bool,
    pub reset_time: NaiveTime,
    pub last_completed: Option<NaiveDateTime>,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>) -> TaskRecord {
        TaskRecord {
            name: name.into(),
            completed: false,
            reset_time: NaiveTime::MIN,
            last_completed: None,
        }
    }

    /// The instant this task's completion expires, if it has one.
    ///
    /// The reset time on the completion's own date marks the boundary; a
    /// completion at or before that instant answers to the previous day's
    /// occurrence instead. The task survives until one full day past the
    /// boundary, which nets out to the first occurrence of the reset time
    /// at or after the completion.
    fn reset_deadline(&self) -> Option<NaiveDateTime> {
        let completed_at = self.last_completed?;
        let mut reset_at = completed_at.date().and_time(self.reset_time);
        if completed_at <= reset_at {
            reset_at = reset_at - Duration::days(1);
        }
        Some(reset_at + Duration::days(1))
    }
}

/// The task collection, in display (insertion) order. Names are unique;
/// the set of tasks is fixed for the lifetime of a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReminderList {
    tasks: Vec<TaskRecord>,
}

impl ReminderList {
    pub fn new(tasks: Vec<TaskRecord>) -> ReminderList {
        ReminderList { tasks }
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut TaskRecord, TaskError> {
        self.tasks
            .iter_mut()
            .find(|task| task.name == name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))
    }

    /// Set a task's completion state. Returns whether anything changed, so
    /// the caller persists only on change; a redundant toggle is a no-op
    /// and leaves the completion timestamp alone.
    pub fn set_completed(
        &mut self,
        name: &str,
        value: bool,
        now: NaiveDateTime,
    ) -> Result<bool, TaskError> {
        let task = self.get_mut(name)?;
        if task.completed == value {
            return Ok(false);
        }
        task.completed = value;
        if value {
            task.last_completed = Some(now);
        } else {
            task.last_completed = None;
        }
        Ok(true)
    }

    /// Change a task's daily reset time. Takes effect on the next
    /// `evaluate`; no re-check is forced here.
    pub fn set_reset_time(&mut self, name: &str, new_time: NaiveTime) -> Result<bool, TaskError> {
        let task = self.get_mut(name)?;
        if task.reset_time == new_time {
            return Ok(false);
        }
        task.reset_time = new_time;
        Ok(true)
    }

    /// Clear every task whose completion has expired at `now`. Returns the
    /// names of the tasks that changed. Idempotent: a cleared task has no
    /// completion timestamp left to expire.
    pub fn evaluate(&mut self, now: NaiveDateTime) -> Vec<String> {
        let mut changed = Vec::new();
        for task in &mut self.tasks {
            let deadline = match task.reset_deadline() {
                Some(deadline) => deadline,
                None => continue,
            };
            if now >= deadline {
                task.completed = false;
                task.last_completed = None;
                changed.push(task.name.clone());
            }
        }
        changed
    }

    /// Mark every task completed, applying the per-task no-op rule: tasks
    /// already completed keep their original timestamps. Returns the names
    /// of the tasks that changed.
    pub fn complete_all(&mut self, now: NaiveDateTime) -> Vec<String> {
        let mut changed = Vec::new();
        for task in &mut self.tasks {
            if !task.completed {
                task.completed = true;
                task.last_completed = Some(now);
                changed.push(task.name.clone());
            }
        }
        changed
    }
}
