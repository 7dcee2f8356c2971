use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

/// Reads a JSON document, `None` when the file does not exist.
pub async fn load_json<S, T>(storage: &S, path: &str) -> Result<Option<T>>
where
    S: Storage,
    T: DeserializeOwned,
{
    if !storage.exists(path).await? {
        return Ok(None);
    }
    let bytes = storage.read_file(path).await?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

pub async fn store_json<S, T>(storage: &S, path: &str, value: &T) -> Result<()>
where
    S: Storage,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;
    storage.write_file(path, &json).await
}

/// All-or-nothing checkpoint of one pipeline stage's output.
///
/// A stage whose file exists is treated as complete; delete the file to force
/// a recompute. A failing producer writes nothing.
pub struct StageCache<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> StageCache<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = load_json(self.storage, key).await? {
            tracing::info!("📂 Using cached stage {}", key);
            return Ok(cached);
        }

        tracing::debug!("Stage {} not cached, computing", key);
        let value = producer().await?;
        store_json(self.storage, key, &value).await?;
        tracing::info!("💾 Cached stage {}", key);
        Ok(value)
    }
}
