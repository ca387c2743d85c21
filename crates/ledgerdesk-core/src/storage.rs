use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("cannot {action} a record in status {from}")]
    InvalidTransition { from: String, action: String },
}

impl StoreError {
    pub fn not_found<R: Record>(id: &str) -> Self {
        StoreError::NotFound { kind: R::KIND, id: id.to_string() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }
}

/// A record type owned by a repository.
///
/// Creation goes through `Draft` (the request body of a create call) and
/// mutation through `Patch`, whose `Some` fields overwrite the stored value.
/// Server-assigned fields (`id`, timestamps, default status) never appear in
/// either.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    type Draft: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Send + 'static;

    /// Human readable name, used in not-found messages and log fields.
    const KIND: &'static str;
    /// Prefix of generated ids, e.g. `l` for `l-3f2a...`.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;

    fn create(id: String, draft: Self::Draft, now: OffsetDateTime) -> Result<Self, StoreError>;

    fn apply(&mut self, patch: Self::Patch, now: OffsetDateTime) -> Result<(), StoreError>;

    fn matches(&self, _filter: &ListFilter) -> bool {
        true
    }
}

/// Extra validation run by a repository before a created or updated record
/// is stored.
pub trait RecordCheck<R>: Send + Sync {
    fn check(&self, record: &R) -> Result<(), StoreError>;
}

pub trait Repository<R: Record>: Send + Sync {
    fn list(&self, filter: &ListFilter) -> Vec<R>;
    fn get(&self, id: &str) -> Result<R, StoreError>;
    fn create(&self, draft: R::Draft) -> Result<R, StoreError>;
    fn update(&self, id: &str, patch: R::Patch) -> Result<R, StoreError>;

    /// Build the patch from the current record and apply it without
    /// releasing the record in between, so `patch_for` can validate state
    /// transitions. The record is left untouched when `patch_for` fails.
    fn update_with(
        &self,
        id: &str,
        patch_for: &mut dyn FnMut(&R) -> Result<R::Patch, StoreError>,
    ) -> Result<R, StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Equality filters taken from a list request's query string.
///
/// Keys a record type does not know are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    terms: BTreeMap<String, String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.terms.get(key).map(String::as_str)
    }

    /// True when `key` is not filtered on, or its value equals `value`.
    pub fn accepts(&self, key: &str, value: &str) -> bool {
        self.get(key).map_or(true, |wanted| wanted == value)
    }

    /// Like `accepts`, for optional fields. An absent field never matches a
    /// filter on it.
    pub fn accepts_opt(&self, key: &str, value: Option<&str>) -> bool {
        match (self.get(key), value) {
            (None, _) => true,
            (Some(wanted), Some(value)) => wanted == value,
            (Some(_), None) => false,
        }
    }
}

impl From<BTreeMap<String, String>> for ListFilter {
    fn from(terms: BTreeMap<String, String>) -> Self {
        Self { terms }
    }
}
