use crate::config::Settings;
use crate::core::cache::StageCache;
use crate::core::fetcher::{parse_user_lists, retrieve_lists};
use crate::core::normalizer::{clean_venues, venues_to_csv};
use crate::core::{ListApi, Pipeline, RawItem, Storage, TransformResult, VenueTable};
use crate::utils::error::Result;
use serde_json::Value;

/// Fetch-and-clean stage: user lists → list items → venue table, each step
/// memoized under its own cache file.
pub struct FetchPipeline<S: Storage, A: ListApi> {
    pub(crate) storage: S,
    pub(crate) api: A,
    pub(crate) settings: Settings,
    pub(crate) user_id: String,
}

impl<S: Storage, A: ListApi> FetchPipeline<S, A> {
    pub fn new(storage: S, api: A, settings: Settings, user_id: String) -> Self {
        Self {
            storage,
            api,
            settings,
            user_id,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, A: ListApi> Pipeline for FetchPipeline<S, A> {
    async fn extract(&self) -> Result<Vec<RawItem>> {
        let cache = StageCache::new(&self.storage);
        let files = &self.settings.files;

        let user_lists: Value = cache
            .get_or_compute(&files.user_lists_cache, || self.api.user_lists(&self.user_id))
            .await?;
        let list_ids: Vec<String> = parse_user_lists(&user_lists)?
            .into_iter()
            .map(|list| list.id)
            .collect();
        tracing::info!("📋 User {} has {} lists", self.user_id, list_ids.len());

        cache
            .get_or_compute(&files.list_items_cache, || {
                retrieve_lists(
                    &self.api,
                    &self.user_id,
                    &list_ids,
                    self.settings.fetch.page_size,
                )
            })
            .await
    }

    async fn transform(&self, items: Vec<RawItem>) -> Result<TransformResult> {
        let cache = StageCache::new(&self.storage);

        let venues: VenueTable = cache
            .get_or_compute(&self.settings.files.venues_cache, || async {
                Ok(clean_venues(&items))
            })
            .await?;
        let csv_output = venues_to_csv(&venues)?;

        Ok(TransformResult { venues, csv_output })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let csv_path = &self.settings.files.venues_csv;
        tracing::debug!(
            "Writing {} venues ({} bytes) to {}",
            result.venues.len(),
            result.csv_output.len(),
            csv_path
        );
        self.storage
            .write_file(csv_path, result.csv_output.as_bytes())
            .await?;
        Ok(csv_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::test_support::MockStorage;
    use crate::core::etl::EtlEngine;
    use crate::core::fetcher::test_support::FakeListApi;
    use crate::domain::ports::Params;
    use crate::utils::error::RefileError;
    use async_trait::async_trait;
    use serde_json::json;

    /// Serves one created list and an empty todo list via `FakeListApi`.
    struct ListsApi {
        inner: FakeListApi,
    }

    #[async_trait]
    impl ListApi for ListsApi {
        async fn get_endpoint(&self, endpoint: &str, params: Params) -> Result<Value> {
            if endpoint == "users/u1/lists" {
                return Ok(json!({"response": {"lists": {"items": [{"id": "l1", "name": "Saved"}]}}}));
            }
            self.inner.get_endpoint(endpoint, params).await
        }

        async fn post_endpoint(&self, endpoint: &str, params: Params) -> Result<Value> {
            self.inner.post_endpoint(endpoint, params).await
        }
    }

    fn pipeline(storage: MockStorage) -> FetchPipeline<MockStorage, ListsApi> {
        let inner = FakeListApi::default()
            .with_list(
                "l1",
                vec![
                    json!({"venue": {"id": "a", "name": "Alpha"}}),
                    json!({"venue": {"id": "b", "name": "Beta", "closed": true}}),
                ],
            )
            .with_list("u1/todos", vec![json!({"venue": {"id": "a", "name": "Alpha"}})]);
        FetchPipeline::new(storage, ListsApi { inner }, Settings::default(), "u1".to_string())
    }

    #[tokio::test]
    async fn test_run_caches_every_stage() {
        let storage = MockStorage::new();
        let engine = EtlEngine::new(pipeline(storage.clone()));

        let report = engine.run().await.unwrap();

        assert_eq!(report.raw_items, 3);
        assert_eq!(report.venues, 1);
        assert_eq!(report.output_path, "venues.csv");
        for file in ["user_lists.json", "list_items.json", "venues.json", "venues.csv"] {
            assert!(storage.get_file(file).await.is_some(), "missing {}", file);
        }
    }

    #[tokio::test]
    async fn test_cached_items_skip_the_api() {
        let storage = MockStorage::new();
        storage
            .put_json("user_lists.json", json!({"response": {"lists": {"items": []}}}))
            .await;
        storage
            .put_json("list_items.json", json!([{"venue": {"id": "cached"}}]))
            .await;

        let pipeline = pipeline(storage.clone());
        let items = pipeline.extract().await.unwrap();

        assert_eq!(items.len(), 1);
        assert!(pipeline.api.inner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_item_cache() {
        let storage = MockStorage::new();
        let pipeline = FetchPipeline::new(
            storage.clone(),
            ListsApi {
                inner: FakeListApi::default(),
            },
            Settings::default(),
            "u1".to_string(),
        );

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, RefileError::HttpStatus { status: 404, .. }));
        assert!(storage.get_file("user_lists.json").await.is_some());
        assert!(storage.get_file("list_items.json").await.is_none());
    }

    #[tokio::test]
    async fn test_zero_page_size_fails_without_caching_items() {
        let storage = MockStorage::new();
        let mut pipeline = pipeline(storage.clone());
        pipeline.settings.fetch.page_size = 0;

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, RefileError::InvalidConfigValueError { .. }));
        assert_eq!(pipeline.api.inner.page_requests("l1"), 0);
        assert!(storage.get_file("list_items.json").await.is_none());
    }
}
