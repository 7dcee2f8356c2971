//! Loading of the fixed JSON documents both workflow stages depend on.

use crate::core::cache::load_json;
use crate::core::{Storage, VenueTable};
use crate::domain::model::{AccessToken, DestinationLists, UserConfig};
use crate::utils::error::{RefileError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::de::DeserializeOwned;

async fn require<S: Storage, T: DeserializeOwned>(storage: &S, path: &str) -> Result<T> {
    load_json(storage, path)
        .await?
        .ok_or_else(|| RefileError::MissingConfigError {
            field: path.to_string(),
        })
}

pub async fn load_access_token<S: Storage>(storage: &S, path: &str) -> Result<AccessToken> {
    let token: AccessToken = require(storage, path).await?;
    validate_non_empty_string("access_token", &token.access_token)?;
    Ok(token)
}

pub async fn load_user_config<S: Storage>(storage: &S, path: &str) -> Result<UserConfig> {
    let config: UserConfig = require(storage, path).await?;
    validate_non_empty_string("user_id", &config.user_id)?;
    Ok(config)
}

pub async fn load_destination_lists<S: Storage>(
    storage: &S,
    path: &str,
) -> Result<DestinationLists> {
    let lists: DestinationLists = require(storage, path).await?;
    if lists.lists.is_empty() {
        return Err(RefileError::ConfigError {
            message: format!("{} lists no destination lists", path),
        });
    }
    Ok(lists)
}

/// The cleaned relation written by the fetch stage.
pub async fn load_venue_table<S: Storage>(storage: &S, path: &str) -> Result<VenueTable> {
    load_json(storage, path)
        .await?
        .ok_or_else(|| RefileError::ConfigError {
            message: format!("{} not found; run fetch_venues first", path),
        })
}
