//! In-memory repository backend.
//!
//! Records live in a process-wide vector in insertion order and are lost on
//! restart. Concurrent writers to the same id resolve last-write-wins.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ledgerdesk_core::{ListFilter, Record, RecordCheck, Repository, StoreError};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod seed;

pub struct InMemoryRepository<R: Record> {
    records: RwLock<Vec<R>>,
    checks: Vec<Arc<dyn RecordCheck<R>>>,
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            checks: Vec::new(),
        }
    }

    /// Run `check` on every record before it is created or updated.
    pub fn with_check(mut self, check: Arc<dyn RecordCheck<R>>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn next_id() -> String {
        format!("{}-{}", R::ID_PREFIX, Uuid::new_v4().simple())
    }

    fn run_checks(&self, record: &R) -> Result<(), StoreError> {
        for check in &self.checks {
            check.check(record)?;
        }
        Ok(())
    }

    /// Patch the record `id` inside an already held write lock.
    fn replace(
        &self,
        records: &mut [R],
        id: &str,
        patch_for: impl FnOnce(&R) -> Result<R::Patch, StoreError>,
    ) -> Result<R, StoreError> {
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found::<R>(id))?;

        let patch = patch_for(slot)?;
        let mut updated = slot.clone();
        updated.apply(patch, OffsetDateTime::now_utc())?;
        self.run_checks(&updated)?;

        *slot = updated.clone();
        tracing::debug!(kind = R::KIND, id, "Record updated");
        Ok(updated)
    }

    // A panic while holding the lock cannot leave a half-written record,
    // since records are replaced whole, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<R>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<R>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: Record> Repository<R> for InMemoryRepository<R> {
    fn list(&self, filter: &ListFilter) -> Vec<R> {
        self.read().iter().filter(|r| r.matches(filter)).cloned().collect()
    }

    fn get(&self, id: &str) -> Result<R, StoreError> {
        self.read()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<R>(id))
    }

    fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        let record = R::create(Self::next_id(), draft, OffsetDateTime::now_utc())?;
        self.run_checks(&record)?;

        self.write().push(record.clone());
        tracing::debug!(kind = R::KIND, id = record.id(), "Record created");
        Ok(record)
    }

    fn update(&self, id: &str, patch: R::Patch) -> Result<R, StoreError> {
        let mut records = self.write();
        self.replace(&mut records, id, |_| Ok(patch))
    }

    fn update_with(
        &self,
        id: &str,
        patch_for: &mut dyn FnMut(&R) -> Result<R::Patch, StoreError>,
    ) -> Result<R, StoreError> {
        let mut records = self.write();
        self.replace(&mut records, id, patch_for)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.write();
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found::<R>(id))?;
        records.remove(position);
        tracing::debug!(kind = R::KIND, id, "Record deleted");
        Ok(())
    }
}
