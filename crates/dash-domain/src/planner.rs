//! Calendar events and to-do tasks.

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub completed: bool,
}

impl Event {
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            start_time: start_time.into(),
            end_time: end_time.into(),
            completed: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn starts_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp(&self.start_time, tz)
    }

    /// End instant; falls back to the start when the end is missing or earlier.
    pub fn ends_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let start = self.starts_at(tz)?;
        match parse_timestamp(&self.end_time, tz) {
            Some(end) if end >= start => Some(end),
            _ => Some(start),
        }
    }
}

impl Identifiable for Event {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Titled for Event {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(user_id: Uuid, title: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            due_date: None,
            priority,
            completed: false,
        }
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn due_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.due_date
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, tz))
    }
}

impl Identifiable for Task {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Titled for Task {
    fn title(&self) -> &str {
        &self.title
    }
}
