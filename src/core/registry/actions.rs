//! UI actions offered alongside results and records.
//!
//! Consumers render these; the registry only records which kinds are
//! enabled in which scope.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Bookmark,
    Citation,
    Sms,
    Email,
    SearchHistory,
    SortWidget,
    PerPageWidget,
    ViewTypeGroup,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Bookmark => "bookmark",
            ActionKind::Citation => "citation",
            ActionKind::Sms => "sms",
            ActionKind::Email => "email",
            ActionKind::SearchHistory => "search_history",
            ActionKind::SortWidget => "sort_widget",
            ActionKind::PerPageWidget => "per_page_widget",
            ActionKind::ViewTypeGroup => "view_type_group",
        }
    }
}

/// Where an action is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScope {
    /// Tools on a single record
    ShowTools,
    /// Controls above a result list
    ResultsCollection,
    Navigation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRegistry {
    entries: Vec<(ActionScope, ActionKind)>,
}

impl ActionRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Default action set of a catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for kind in [
            ActionKind::Bookmark,
            ActionKind::Citation,
            ActionKind::Email,
            ActionKind::Sms,
        ] {
            registry.add(ActionScope::ShowTools, kind);
        }
        registry.add(ActionScope::Navigation, ActionKind::Bookmark);
        registry.add(ActionScope::Navigation, ActionKind::SearchHistory);
        registry
    }

    /// Actions of the artifact catalog
    pub fn artifact_catalog() -> Self {
        let mut registry = Self::with_defaults();
        registry.remove(ActionScope::ShowTools, ActionKind::Citation);
        registry.remove(ActionScope::ShowTools, ActionKind::Sms);
        registry.remove(ActionScope::ShowTools, ActionKind::Email);
        registry.add(ActionScope::ResultsCollection, ActionKind::SortWidget);
        registry.add(ActionScope::ResultsCollection, ActionKind::PerPageWidget);
        registry.add(ActionScope::ResultsCollection, ActionKind::ViewTypeGroup);
        registry.add(ActionScope::Navigation, ActionKind::SearchHistory);
        registry
    }

    /// Enable `kind` in `scope`; no-op if already enabled
    pub fn add(&mut self, scope: ActionScope, kind: ActionKind) -> &mut Self {
        if !self.contains(scope, kind) {
            self.entries.push((scope, kind));
        }
        self
    }

    /// Returns whether anything was removed
    pub fn remove(&mut self, scope: ActionScope, kind: ActionKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&(s, k)| !(s == scope && k == kind));
        self.entries.len() != before
    }

    pub fn contains(&self, scope: ActionScope, kind: ActionKind) -> bool {
        self.entries.iter().any(|&(s, k)| s == scope && k == kind)
    }

    /// Enabled kinds for a scope, in insertion order
    pub fn actions(&self, scope: ActionScope) -> Vec<ActionKind> {
        self.entries
            .iter()
            .filter(|(s, _)| *s == scope)
            .map(|(_, k)| *k)
            .collect()
    }
}
