//! Durable storage for `WorkspaceState`.
//!
//! The whole state lives in one slot under a fixed storage name, written as
//! JSON. File slots write to a temporary file and rename it into place so a
//! crash mid-write never leaves a truncated slot behind.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;

use crate::{
    sync::MatchPolicy,
    tabs::{ActivationPolicy, Tab, TabStore, WorkspaceState},
};

/// Default slot name for the workspace layout.
pub const STORAGE_NAME: &str = "workspace-layout";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait StateSlot: Send {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<WorkspaceState>, WorkspaceError>;
    fn save(&self, state: &WorkspaceState) -> Result<(), WorkspaceError>;
}

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl AsRef<Path>, storage_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", storage_name)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSlot for FileSlot {
    fn load(&self) -> Result<Option<WorkspaceState>, WorkspaceError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to parse stored workspace state, starting from defaults"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &WorkspaceState) -> Result<(), WorkspaceError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_vec_pretty(state)?)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Slot held in memory. Clones share the same slot, which lets tests
/// reopen a workspace as if after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl StateSlot for MemorySlot {
    fn load(&self) -> Result<Option<WorkspaceState>, WorkspaceError> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &WorkspaceState) -> Result<(), WorkspaceError> {
        let raw = serde_json::to_string(state)?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }
}

/// A `TabStore` that writes itself to a `StateSlot` after every change.
pub struct PersistedWorkspace {
    store: TabStore,
    slot: Box<dyn StateSlot>,
    matching: MatchPolicy,
}

impl PersistedWorkspace {
    /// Rehydrate from `slot`, falling back to the default state when the
    /// slot is empty.
    pub fn open(
        slot: Box<dyn StateSlot>,
        activation: ActivationPolicy,
        matching: MatchPolicy,
    ) -> Result<Self, WorkspaceError> {
        let state = slot.load()?.unwrap_or_default();
        tracing::debug!(tabs = state.tabs.len(), active = ?state.active_tab_id, "Workspace state loaded");
        Ok(Self {
            store: TabStore::from_state(state, activation),
            slot,
            matching,
        })
    }

    pub fn state(&self) -> &WorkspaceState {
        self.store.state()
    }

    /// Apply `change` to a copy of the store and keep it only once the slot
    /// accepted the new state.
    fn persist<T>(&mut self, change: impl FnOnce(&mut TabStore) -> T) -> Result<T, WorkspaceError> {
        let mut next = self.store.clone();
        let out = change(&mut next);
        self.slot.save(next.state())?;
        self.store = next;
        Ok(out)
    }

    pub fn add_tab(&mut self, tab: Tab) -> Result<bool, WorkspaceError> {
        self.persist(|s| s.add_tab(tab))
    }

    pub fn remove_tab(&mut self, id: &str) -> Result<Option<Tab>, WorkspaceError> {
        self.persist(|s| s.remove_tab(id))
    }

    pub fn set_active_tab(&mut self, id: Option<String>) -> Result<(), WorkspaceError> {
        self.persist(|s| s.set_active_tab(id))
    }

    pub fn reorder_tabs(&mut self, tabs: Vec<Tab>) -> Result<(), WorkspaceError> {
        self.persist(|s| s.reorder_tabs(tabs))
    }

    pub fn close_all_tabs(&mut self) -> Result<(), WorkspaceError> {
        self.persist(TabStore::close_all_tabs)
    }

    pub fn close_other_tabs(&mut self, id: &str) -> Result<(), WorkspaceError> {
        self.persist(|s| s.close_other_tabs(id))
    }

    pub fn set_sidebar_open(&mut self, open: bool) -> Result<(), WorkspaceError> {
        self.persist(|s| s.set_sidebar_open(open))
    }

    /// Only writes the slot when the active tab actually changed.
    pub fn sync_location(&mut self, location: &str) -> Result<Option<String>, WorkspaceError> {
        let mut next = self.store.clone();
        let changed = next.sync_location(location, self.matching);
        if changed.is_some() {
            self.slot.save(next.state())?;
            self.store = next;
        }
        Ok(changed)
    }
}
