use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{calendar, require};
use crate::storage::{ListFilter, Record, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Resigned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub tenant_id: String,
    pub employee_no: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    #[serde(with = "calendar")]
    pub hire_date: Date,
    pub status: EmployeeStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub tenant_id: String,
    pub employee_no: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(with = "calendar")]
    pub hire_date: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeePatch {
    pub tenant_id: Option<String>,
    pub employee_no: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    #[serde(default, with = "calendar::option")]
    pub hire_date: Option<Date>,
    pub status: Option<EmployeeStatus>,
}

impl Record for Employee {
    type Draft = EmployeeDraft;
    type Patch = EmployeePatch;

    const KIND: &'static str = "employee";
    const ID_PREFIX: &'static str = "e";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: EmployeeDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("tenantId", &draft.tenant_id)?;
        require("employeeNo", &draft.employee_no)?;
        require("name", &draft.name)?;
        Ok(Employee {
            id,
            tenant_id: draft.tenant_id,
            employee_no: draft.employee_no,
            name: draft.name,
            email: draft.email,
            department: draft.department,
            position: draft.position,
            hire_date: draft.hire_date,
            status: EmployeeStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: EmployeePatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(tenant_id) = patch.tenant_id {
            require("tenantId", &tenant_id)?;
            self.tenant_id = tenant_id;
        }
        if let Some(employee_no) = patch.employee_no {
            require("employeeNo", &employee_no)?;
            self.employee_no = employee_no;
        }
        if let Some(name) = patch.name {
            require("name", &name)?;
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(hire_date) = patch.hire_date {
            self.hire_date = hire_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("tenantId", &self.tenant_id)
            && filter.accepts("department", &self.department)
            && filter.accepts("status", self.status.as_ref())
    }
}
