use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sync::{self, MatchPolicy};

/// An open module or document in the workspace tab bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub title: String,
    #[serde(alias = "url")]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl Tab {
    pub fn new(id: impl Into<String>, title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            href: href.into(),
            icon: None,
            is_pinned: None,
        }
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    #[serde(default = "default_sidebar_open")]
    pub sidebar_open: bool,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active_tab_id: Option<String>,
}

fn default_sidebar_open() -> bool {
    true
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            sidebar_open: default_sidebar_open(),
            tabs: Vec::new(),
            active_tab_id: None,
        }
    }
}

impl WorkspaceState {
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    /// Keep the first tab of each id and clear an active id whose tab is
    /// not open.
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.tabs.retain(|t| seen.insert(t.id.clone()));
        if self.active_tab().is_none() {
            self.active_tab_id = None;
        }
    }
}

/// Which tab becomes active when the active one is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationPolicy {
    /// The last tab left in the bar.
    #[default]
    LastRemaining,
    /// The most recently active tab that is still open, else the last one.
    PreviousActive,
}

#[derive(Debug, Clone, Default)]
pub struct TabStore {
    state: WorkspaceState,
    policy: ActivationPolicy,
    // ids that were active before the current one, oldest first
    history: Vec<String>,
}

impl TabStore {
    pub fn new(policy: ActivationPolicy) -> Self {
        Self::from_state(WorkspaceState::default(), policy)
    }

    /// Start from a stored state, normalized first.
    pub fn from_state(mut state: WorkspaceState, policy: ActivationPolicy) -> Self {
        state.normalize();
        Self {
            state,
            policy,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn into_state(self) -> WorkspaceState {
        self.state
    }

    fn activate(&mut self, id: Option<String>) {
        if self.state.active_tab_id == id {
            return;
        }
        if let Some(previous) = self.state.active_tab_id.take() {
            self.history.retain(|h| *h != previous);
            self.history.push(previous);
        }
        if let Some(next) = id.as_deref() {
            self.history.retain(|h| h != next);
        }
        self.state.active_tab_id = id;
    }

    /// Open `tab`, or just activate it when a tab with its id is already
    /// open. Returns true when the tab was inserted.
    pub fn add_tab(&mut self, tab: Tab) -> bool {
        let id = tab.id.clone();
        let inserted = self.state.tab(&id).is_none();
        if inserted {
            self.state.tabs.push(tab);
        }
        self.activate(Some(id));
        inserted
    }

    pub fn remove_tab(&mut self, id: &str) -> Option<Tab> {
        let position = self.state.tabs.iter().position(|t| t.id == id)?;
        let removed = self.state.tabs.remove(position);
        self.history.retain(|h| h != id);

        if self.state.active_tab_id.as_deref() == Some(id) {
            self.state.active_tab_id = self.replacement();
        }
        Some(removed)
    }

    fn replacement(&mut self) -> Option<String> {
        if self.policy == ActivationPolicy::PreviousActive {
            while let Some(candidate) = self.history.pop() {
                if self.state.tab(&candidate).is_some() {
                    return Some(candidate);
                }
            }
        }
        self.state.tabs.last().map(|t| t.id.clone())
    }

    /// Activate `id` without checking that it is open.
    pub fn set_active_tab(&mut self, id: Option<String>) {
        self.activate(id);
    }

    /// Replace the tab sequence. Duplicate ids keep their first occurrence,
    /// and the active id is cleared if its tab is gone.
    pub fn reorder_tabs(&mut self, tabs: Vec<Tab>) {
        self.state.tabs = tabs;
        self.state.normalize();

        let tabs = &self.state.tabs;
        self.history.retain(|h| tabs.iter().any(|t| t.id == *h));
    }

    pub fn close_all_tabs(&mut self) {
        self.state.tabs.clear();
        self.state.active_tab_id = None;
        self.history.clear();
    }

    pub fn close_other_tabs(&mut self, id: &str) {
        self.state.tabs.retain(|t| t.id == id);
        self.history.clear();
        self.state.active_tab_id = self.state.tabs.first().map(|t| t.id.clone());
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.state.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.state.sidebar_open = !self.state.sidebar_open;
        self.state.sidebar_open
    }

    /// Activate the open tab that owns `location`. Never opens or closes
    /// tabs. Returns the id of the tab that became active, if any changed.
    pub fn sync_location(&mut self, location: &str, policy: MatchPolicy) -> Option<String> {
        let id = sync::find_tab(&self.state.tabs, location, policy)?.id.clone();
        if self.state.active_tab_id.as_deref() == Some(id.as_str()) {
            return None;
        }
        self.activate(Some(id.clone()));
        Some(id)
    }
}
