//! Resolve a store reference typed by a user ("S001", "downtown", "Dowtown")
//! to a store in the dataset.

use crate::dataset::{Dataset, Store};
use crate::error::{InsightError, Result};
use strsim::jaro_winkler;
use tracing::debug;

pub struct StoreMatcher {
    /// Similarity threshold (0.0-1.0) for accepting a fuzzy name match
    pub similarity_threshold: f64,
}

impl Default for StoreMatcher {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
        }
    }
}

impl StoreMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            similarity_threshold: threshold,
        }
    }

    fn normalize(s: &str) -> String {
        s.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Exact id, then case-insensitive id or name, then the closest name above
    /// the threshold.
    pub fn resolve<'a>(&self, dataset: &'a Dataset, reference: &str) -> Result<&'a Store> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(InsightError::InvalidInput("Store reference is empty".to_string()));
        }
        if let Some(store) = dataset.store(reference) {
            return Ok(store);
        }

        let wanted = Self::normalize(reference);
        if let Some(store) = dataset.stores().find(|s| {
            s.store_id.eq_ignore_ascii_case(reference) || Self::normalize(&s.store_name) == wanted
        }) {
            return Ok(store);
        }

        let best = dataset
            .stores()
            .map(|s| (s, jaro_winkler(&wanted, &Self::normalize(&s.store_name))))
            .filter(|(_, score)| *score >= self.similarity_threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((store, score)) => {
                debug!(reference, store_id = %store.store_id, score, "Fuzzy store match");
                Ok(store)
            }
            None => Err(InsightError::InvalidInput(format!(
                "No store matches '{}'",
                reference
            ))),
        }
    }
}
