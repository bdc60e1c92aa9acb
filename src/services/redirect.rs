//! Redirect resolution
//!
//! Looks up a short code case-insensitively and hands the last-access
//! update to the [`AccessTracker`] without waiting for it.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::errors::{LinkerError, Result};
use crate::storage::AliasStore;
use crate::tasks::AccessTracker;
use crate::utils::is_valid_code_format;

pub struct RedirectResolver {
    store: Arc<dyn AliasStore>,
    tracker: AccessTracker,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn AliasStore>, tracker: AccessTracker) -> Self {
        Self { store, tracker }
    }

    /// 返回短码对应的原始 URL
    pub async fn resolve(&self, code: &str) -> Result<String> {
        if !is_valid_code_format(code) {
            return Err(LinkerError::invalid_format(format!(
                "Invalid short code format: '{}'",
                code
            )));
        }

        let code = code.to_ascii_lowercase();
        let Some(record) = self.store.find_by_code(&code).await? else {
            debug!("Short code not found: {}", code);
            return Err(LinkerError::not_found(format!(
                "Short code '{}' does not exist",
                code
            )));
        };

        self.tracker.record(&record.short_code, Utc::now());
        Ok(record.original_url)
    }
}
