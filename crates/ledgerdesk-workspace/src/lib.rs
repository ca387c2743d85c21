//! Open-tab bookkeeping for the admin workspace.
//!
//! `TabStore` is a plain state machine over `WorkspaceState`,
//! `sync` keeps the active tab in line with the current location, and
//! `persist` writes the state to a durable slot after every change.

pub mod persist;
pub mod sync;
pub mod tabs;

pub use persist::{FileSlot, MemorySlot, PersistedWorkspace, StateSlot, WorkspaceError, STORAGE_NAME};
pub use sync::MatchPolicy;
pub use tabs::{ActivationPolicy, Tab, TabStore, WorkspaceState};
