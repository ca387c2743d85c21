use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::require;
use crate::storage::{ListFilter, Record, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDraft {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TenantPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl Record for Tenant {
    type Draft = TenantDraft;
    type Patch = TenantPatch;

    const KIND: &'static str = "tenant";
    const ID_PREFIX: &'static str = "tn";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: TenantDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("code", &draft.code)?;
        require("name", &draft.name)?;
        Ok(Tenant {
            id,
            code: draft.code,
            name: draft.name,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: TenantPatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(code) = patch.code {
            require("code", &code)?;
            self.code = code;
        }
        if let Some(name) = patch.name {
            require("name", &name)?;
            self.name = name;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("isActive", if self.is_active { "true" } else { "false" })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub tenant_id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    pub tenant_id: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl Record for User {
    type Draft = UserDraft;
    type Patch = UserPatch;

    const KIND: &'static str = "user";
    const ID_PREFIX: &'static str = "u";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: UserDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("tenantId", &draft.tenant_id)?;
        require("username", &draft.username)?;
        require("name", &draft.name)?;
        Ok(User {
            id,
            tenant_id: draft.tenant_id,
            username: draft.username,
            name: draft.name,
            email: draft.email,
            role: draft.role.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UserPatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(tenant_id) = patch.tenant_id {
            require("tenantId", &tenant_id)?;
            self.tenant_id = tenant_id;
        }
        if let Some(username) = patch.username {
            require("username", &username)?;
            self.username = username;
        }
        if let Some(name) = patch.name {
            require("name", &name)?;
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("tenantId", &self.tenant_id) && filter.accepts("role", self.role.as_ref())
    }
}

/// A lookup value shared across screens, grouped by `groupCode`
/// (e.g. `DEPARTMENT`, `ACCOUNT`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonCode {
    pub id: String,
    pub group_code: String,
    pub code: String,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonCodeDraft {
    pub group_code: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommonCodePatch {
    pub group_code: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Record for CommonCode {
    type Draft = CommonCodeDraft;
    type Patch = CommonCodePatch;

    const KIND: &'static str = "common code";
    const ID_PREFIX: &'static str = "cc";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: CommonCodeDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("groupCode", &draft.group_code)?;
        require("code", &draft.code)?;
        require("name", &draft.name)?;
        Ok(CommonCode {
            id,
            group_code: draft.group_code,
            code: draft.code,
            name: draft.name,
            sort_order: draft.sort_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: CommonCodePatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(group_code) = patch.group_code {
            require("groupCode", &group_code)?;
            self.group_code = group_code;
        }
        if let Some(code) = patch.code {
            require("code", &code)?;
            self.code = code;
        }
        if let Some(name) = patch.name {
            require("name", &name)?;
            self.name = name;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("groupCode", &self.group_code)
    }
}
