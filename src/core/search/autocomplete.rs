//! Search box suggestions.

use super::retry::RetryPolicy;
use crate::core::backend::SearchBackend;
use crate::core::config::AutocompleteConfig;
use crate::core::error::{Result, VitrineError};
use std::collections::HashSet;
use std::sync::Arc;

/// Turns partial input into completions from the backend's dictionary
pub struct AutocompleteAdapter {
    config: AutocompleteConfig,
    backend: Arc<dyn SearchBackend>,
    retry: RetryPolicy,
}

impl AutocompleteAdapter {
    pub fn new(config: AutocompleteConfig, backend: Arc<dyn SearchBackend>, retry: RetryPolicy) -> Self {
        Self {
            config,
            backend,
            retry,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Completions for `partial`, best first
    ///
    /// # Errors
    ///
    /// `AutocompleteDisabled` unless enabled in the configuration.
    pub async fn suggest(&self, partial: &str) -> Result<Vec<String>> {
        if !self.config.enabled {
            return Err(VitrineError::AutocompleteDisabled);
        }

        let prefix = partial.trim().to_lowercase();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.config.max_suggestions;
        let backend = Arc::clone(&self.backend);
        let raw = self
            .retry
            .run("suggest", || {
                let backend = Arc::clone(&backend);
                let prefix = prefix.clone();
                async move { backend.suggest(&prefix, limit).await }
            })
            .await?;

        let mut seen = HashSet::new();
        let suggestions: Vec<String> = raw
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .filter(|s| seen.insert(s.clone()))
            .take(limit)
            .collect();

        tracing::debug!(prefix = %prefix, count = suggestions.len(), "Autocomplete");
        Ok(suggestions)
    }
}
