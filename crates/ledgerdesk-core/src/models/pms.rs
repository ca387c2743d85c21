use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{calendar, nullable, require};
use crate::storage::{ListFilter, Record, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    OnHold,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub tenant_id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub manager_id: Option<String>,
    #[serde(with = "calendar")]
    pub start_date: Date,
    #[serde(default, with = "calendar::option")]
    pub end_date: Option<Date>,
    pub status: ProjectStatus,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub tenant_id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(with = "calendar")]
    pub start_date: Date,
    #[serde(default, with = "calendar::option")]
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    pub tenant_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub manager_id: Option<Option<String>>,
    #[serde(default, with = "calendar::option")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "calendar::nullable::deserialize")]
    pub end_date: Option<Option<Date>>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
}

fn check_dates(start: Date, end: Option<Date>) -> Result<(), StoreError> {
    match end {
        Some(end) if end < start => Err(StoreError::validation(format!(
            "endDate {} is before startDate {}",
            end, start
        ))),
        _ => Ok(()),
    }
}

impl Record for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: &'static str = "project";
    const ID_PREFIX: &'static str = "p";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: ProjectDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("tenantId", &draft.tenant_id)?;
        require("code", &draft.code)?;
        require("name", &draft.name)?;
        check_dates(draft.start_date, draft.end_date)?;
        Ok(Project {
            id,
            tenant_id: draft.tenant_id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            manager_id: draft.manager_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: ProjectStatus::default(),
            progress: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: ProjectPatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(StoreError::validation(format!("progress {} is above 100", progress)));
            }
        }
        check_dates(
            patch.start_date.unwrap_or(self.start_date),
            patch.end_date.unwrap_or(self.end_date),
        )?;

        if let Some(tenant_id) = patch.tenant_id {
            require("tenantId", &tenant_id)?;
            self.tenant_id = tenant_id;
        }
        if let Some(code) = patch.code {
            require("code", &code)?;
            self.code = code;
        }
        if let Some(name) = patch.name {
            require("name", &name)?;
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(manager_id) = patch.manager_id {
            self.manager_id = manager_id;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("tenantId", &self.tenant_id)
            && filter.accepts("status", self.status.as_ref())
            && filter.accepts_opt("managerId", self.manager_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default, with = "calendar::option")]
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, with = "calendar::option")]
    pub due_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub assignee_id: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "calendar::nullable::deserialize")]
    pub due_date: Option<Option<Date>>,
}

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const KIND: &'static str = "task";
    const ID_PREFIX: &'static str = "t";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: TaskDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("projectId", &draft.project_id)?;
        require("title", &draft.title)?;
        Ok(Task {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            assignee_id: draft.assignee_id,
            priority: draft.priority.unwrap_or_default(),
            status: TaskStatus::default(),
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: TaskPatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(project_id) = patch.project_id {
            require("projectId", &project_id)?;
            self.project_id = project_id;
        }
        if let Some(title) = patch.title {
            require("title", &title)?;
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("projectId", &self.project_id)
            && filter.accepts("status", self.status.as_ref())
            && filter.accepts_opt("assigneeId", self.assignee_id.as_deref())
    }
}
