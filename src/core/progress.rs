use crate::core::cache::{load_json, store_json};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// Union of the persisted set and the in-memory set.
pub fn merge_progress(on_disk: BTreeSet<String>, in_memory: &BTreeSet<String>) -> BTreeSet<String> {
    let mut merged = on_disk;
    merged.extend(in_memory.iter().cloned());
    merged
}

/// The durable checkpoint of a migration: venues re-filed and venues deferred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    categorized: BTreeSet<String>,
    skipped: BTreeSet<String>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<S: Storage>(
        storage: &S,
        categorized_path: &str,
        skipped_path: &str,
    ) -> Result<Self> {
        let categorized = load_set(storage, categorized_path).await?;
        let mut skipped = load_set(storage, skipped_path).await?;
        skipped.retain(|id| !categorized.contains(id));

        tracing::info!(
            "📂 Loaded progress: {} categorized, {} skipped",
            categorized.len(),
            skipped.len()
        );
        Ok(Self {
            categorized,
            skipped,
        })
    }

    pub fn categorized(&self) -> &BTreeSet<String> {
        &self.categorized
    }

    pub fn skipped(&self) -> &BTreeSet<String> {
        &self.skipped
    }

    /// Identifiers in either set.
    pub fn handled(&self) -> BTreeSet<String> {
        self.categorized.union(&self.skipped).cloned().collect()
    }

    pub fn is_handled(&self, venue_id: &str) -> bool {
        self.categorized.contains(venue_id) || self.skipped.contains(venue_id)
    }

    pub fn mark_categorized(&mut self, venue_id: &str) {
        self.skipped.remove(venue_id);
        self.categorized.insert(venue_id.to_string());
    }

    /// A venue already categorized stays categorized.
    pub fn mark_skipped(&mut self, venue_id: &str) {
        if !self.categorized.contains(venue_id) {
            self.skipped.insert(venue_id.to_string());
        }
    }

    /// Merges both sets into what is on disk and writes them back.
    ///
    /// Entries are never removed from `categorized`; an id categorized in any
    /// run is dropped from `skipped` so the two files stay disjoint.
    pub async fn persist<S: Storage>(
        &self,
        storage: &S,
        categorized_path: &str,
        skipped_path: &str,
    ) -> Result<()> {
        let categorized = merge_progress(load_set(storage, categorized_path).await?, &self.categorized);
        let mut skipped = merge_progress(load_set(storage, skipped_path).await?, &self.skipped);
        skipped.retain(|id| !categorized.contains(id));

        store_json(storage, categorized_path, &categorized).await?;
        store_json(storage, skipped_path, &skipped).await?;

        tracing::info!(
            "💾 Saved progress: {} categorized, {} skipped",
            categorized.len(),
            skipped.len()
        );
        Ok(())
    }
}

async fn load_set<S: Storage>(storage: &S, path: &str) -> Result<BTreeSet<String>> {
    let ids: Option<Vec<String>> = load_json(storage, path).await?;
    Ok(ids.unwrap_or_default().into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::test_support::MockStorage;
    use serde_json::json;

    const CATEGORIZED: &str = "categorized_venues.json";
    const SKIPPED: &str = "skipped_venues.json";

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_is_union() {
        let merged = merge_progress(set(&["a", "b"]), &set(&["b", "c"]));
        assert_eq!(merged, set(&["a", "b", "c"]));
    }

    #[test]
    fn test_marks_keep_sets_disjoint() {
        let mut progress = Progress::new();
        progress.mark_skipped("a");
        progress.mark_categorized("a");
        progress.mark_skipped("a");

        assert_eq!(progress.categorized(), &set(&["a"]));
        assert!(progress.skipped().is_empty());
        assert!(progress.is_handled("a"));
    }

    #[tokio::test]
    async fn test_load_absent_files_is_empty() {
        let storage = MockStorage::new();
        let progress = Progress::load(&storage, CATEGORIZED, SKIPPED).await.unwrap();
        assert_eq!(progress, Progress::new());
    }

    #[tokio::test]
    async fn test_persist_merges_with_disk_state() {
        let storage = MockStorage::new();
        storage.put_json(CATEGORIZED, json!(["old-cat"])).await;
        storage.put_json(SKIPPED, json!(["old-skip", "new-cat"])).await;

        let mut progress = Progress::new();
        progress.mark_categorized("new-cat");
        progress.mark_skipped("new-skip");
        progress.persist(&storage, CATEGORIZED, SKIPPED).await.unwrap();

        let reloaded = Progress::load(&storage, CATEGORIZED, SKIPPED).await.unwrap();
        assert_eq!(reloaded.categorized(), &set(&["new-cat", "old-cat"]));
        assert_eq!(reloaded.skipped(), &set(&["new-skip", "old-skip"]));
        assert_eq!(reloaded.handled().len(), 4);
    }

    #[tokio::test]
    async fn test_consecutive_runs_are_monotonic() {
        let storage = MockStorage::new();

        let mut first = Progress::new();
        first.mark_categorized("a");
        first.mark_skipped("b");
        first.persist(&storage, CATEGORIZED, SKIPPED).await.unwrap();

        let mut second = Progress::load(&storage, CATEGORIZED, SKIPPED).await.unwrap();
        second.mark_categorized("c");
        second.persist(&storage, CATEGORIZED, SKIPPED).await.unwrap();

        let after = Progress::load(&storage, CATEGORIZED, SKIPPED).await.unwrap();
        assert!(after.handled().is_superset(&first.handled()));
        assert!(after.handled().is_superset(&second.handled()));
        assert!(after.categorized().is_disjoint(after.skipped()));
    }
}
