use crate::domain::model::{RawItem, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Query parameters for a single API call.
pub type Params = Vec<(String, String)>;

/// Capability object for the list provider. Implementations fail on any
/// non-2xx response and inspect the remaining quota after every call.
#[async_trait]
pub trait ListApi: Send + Sync {
    async fn get_endpoint(&self, endpoint: &str, params: Params) -> Result<Value>;
    async fn post_endpoint(&self, endpoint: &str, params: Params) -> Result<Value>;

    async fn user_lists(&self, user_id: &str) -> Result<Value> {
        let endpoint = format!("users/{}/lists", user_id);
        self.get_endpoint(&endpoint, vec![("group".to_string(), "created".to_string())])
            .await
    }

    async fn list_page(&self, list_id: &str, limit: usize, offset: usize) -> Result<Value> {
        let endpoint = format!("lists/{}", list_id);
        let params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        self.get_endpoint(&endpoint, params).await
    }

    async fn add_to_list(&self, list_id: &str, venue_id: &str) -> Result<Value> {
        let endpoint = format!("lists/{}/additem", list_id);
        self.post_endpoint(&endpoint, vec![("venueId".to_string(), venue_id.to_string())])
            .await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawItem>>;
    async fn transform(&self, items: Vec<RawItem>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
