//! Matching the current location against open tabs.
//!
//! A tab owns a location when the location equals its `href`, or extends it
//! by at least one path segment (`/pms/projects` owns `/pms/projects/42` but
//! not `/pms/projects-archive`). Query strings, fragments and trailing
//! slashes are ignored.

use serde::{Deserialize, Serialize};

use crate::tabs::Tab;

/// Which tab wins when several open tabs own the same location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// First owning tab in tab-bar order.
    FirstMatch,
    /// Owning tab with the longest href; ties go to the earlier tab.
    #[default]
    LongestPrefix,
}

fn normalize(path: &str) -> &str {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

pub fn owns(href: &str, location: &str) -> bool {
    let href = normalize(href);
    let location = normalize(location);
    if href == location {
        return true;
    }
    href != "/"
        && location
            .strip_prefix(href)
            .map_or(false, |rest| rest.starts_with('/'))
}

pub fn find_tab<'a>(tabs: &'a [Tab], location: &str, policy: MatchPolicy) -> Option<&'a Tab> {
    let mut owners = tabs.iter().filter(|t| owns(&t.href, location));
    match policy {
        MatchPolicy::FirstMatch => owners.next(),
        MatchPolicy::LongestPrefix => owners.fold(None, |best: Option<&Tab>, tab| match best {
            Some(b) if normalize(&b.href).len() >= normalize(&tab.href).len() => Some(b),
            _ => Some(tab),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::{ActivationPolicy, TabStore};

    #[test]
    fn test_owns() {
        assert!(owns("/pms/projects", "/pms/projects"));
        assert!(owns("/pms/projects", "/pms/projects/42"));
        assert!(owns("/pms/projects/", "/pms/projects/42/edit?tab=1"));
        assert!(owns("/pms/projects", "/pms/projects#top"));
        assert!(!owns("/pms/projects", "/pms/projects-archive"));
        assert!(!owns("/pms/projects/42", "/pms/projects"));
        assert!(owns("/", "/"));
        assert!(!owns("/", "/finance"));
    }

    #[test]
    fn test_prefix_match_activates_tab() {
        let mut store = TabStore::new(ActivationPolicy::LastRemaining);
        store.add_tab(Tab::new("a", "Projects", "/pms/projects"));
        store.add_tab(Tab::new("b", "Ledgers", "/finance/ledgers"));

        let changed = store.sync_location("/pms/projects/42", MatchPolicy::default());
        assert_eq!(changed.as_deref(), Some("a"));
        assert_eq!(store.state().active_tab_id.as_deref(), Some("a"));

        // already active
        assert_eq!(store.sync_location("/pms/projects", MatchPolicy::default()), None);
    }

    #[test]
    fn test_no_match_is_noop() {
        let mut store = TabStore::new(ActivationPolicy::LastRemaining);
        assert_eq!(store.sync_location("/anything", MatchPolicy::FirstMatch), None);

        store.add_tab(Tab::new("a", "Projects", "/pms/projects"));
        assert_eq!(store.sync_location("/hrm/employees", MatchPolicy::FirstMatch), None);
        assert_eq!(store.state().tabs.len(), 1);
        assert_eq!(store.state().active_tab_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_overlapping_hrefs() {
        let tabs = vec![
            Tab::new("list", "Projects", "/pms/projects"),
            Tab::new("detail", "Project 42", "/pms/projects/42"),
        ];
        let location = "/pms/projects/42/tasks";

        assert_eq!(find_tab(&tabs, location, MatchPolicy::FirstMatch).unwrap().id, "list");
        assert_eq!(find_tab(&tabs, location, MatchPolicy::LongestPrefix).unwrap().id, "detail");
        assert_eq!(find_tab(&tabs, "/pms/projects/7", MatchPolicy::LongestPrefix).unwrap().id, "list");
    }
}
