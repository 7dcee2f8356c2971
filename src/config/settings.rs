use crate::domain::ports::Storage;
use crate::utils::error::{RefileError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

/// Settings file looked up in the data directory.
pub const SETTINGS_FILE: &str = "refile.toml";

pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub fetch: FetchSettings,
    pub files: PipelinePaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub version: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.foursquare.com/v2".to_string(),
            version: "20170509".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub page_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Every document the two workflow stages read or write, relative to the
/// data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelinePaths {
    pub token: String,
    pub user_config: String,
    pub destination_lists: String,
    pub categorized: String,
    pub skipped: String,
    pub user_lists_cache: String,
    pub list_items_cache: String,
    pub venues_cache: String,
    pub venues_csv: String,
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            token: "oauth_token.json".to_string(),
            user_config: "fs_list_data_config.json".to_string(),
            destination_lists: "fs_lists.json".to_string(),
            categorized: "categorized_venues.json".to_string(),
            skipped: "skipped_venues.json".to_string(),
            user_lists_cache: "user_lists.json".to_string(),
            list_items_cache: "list_items.json".to_string(),
            venues_cache: "venues.json".to_string(),
            venues_csv: "venues.csv".to_string(),
        }
    }
}

impl PipelinePaths {
    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("files.token", self.token.as_str()),
            ("files.user_config", self.user_config.as_str()),
            ("files.destination_lists", self.destination_lists.as_str()),
            ("files.categorized", self.categorized.as_str()),
            ("files.skipped", self.skipped.as_str()),
            ("files.user_lists_cache", self.user_lists_cache.as_str()),
            ("files.list_items_cache", self.list_items_cache.as_str()),
            ("files.venues_cache", self.venues_cache.as_str()),
            ("files.venues_csv", self.venues_csv.as_str()),
        ]
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RefileError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Reads `refile.toml` from storage when present, defaults otherwise.
    pub async fn load_or_default<S: Storage>(storage: &S) -> Result<Self> {
        if !storage.exists(SETTINGS_FILE).await? {
            tracing::debug!("No {} found, using default settings", SETTINGS_FILE);
            return Ok(Self::default());
        }

        let bytes = storage.read_file(SETTINGS_FILE).await?;
        let content = String::from_utf8(bytes).map_err(|e| RefileError::ConfigError {
            message: format!("{} is not valid UTF-8: {}", SETTINGS_FILE, e),
        })?;
        tracing::info!("Loaded settings from {}", SETTINGS_FILE);
        Self::from_toml_str(&content)
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RefileError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_non_empty_string("api.version", &self.api.version)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validate_range("fetch.page_size", self.fetch.page_size, 1, MAX_PAGE_SIZE)?;

        for (field, path) in self.files.entries() {
            validate_path(field, path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_fixed_file_names() {
        let settings = Settings::default();

        assert_eq!(settings.files.token, "oauth_token.json");
        assert_eq!(settings.files.categorized, "categorized_venues.json");
        assert_eq!(settings.files.skipped, "skipped_venues.json");
        assert_eq!(settings.fetch.page_size, 200);
        assert_eq!(settings.api.version, "20170509");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml_content = r#"
[api]
base_url = "http://127.0.0.1:9000/v2"

[files]
venues_cache = "cache/venues.json"
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.api.base_url, "http://127.0.0.1:9000/v2");
        assert_eq!(settings.api.version, "20170509");
        assert_eq!(settings.files.venues_cache, "cache/venues.json");
        assert_eq!(settings.files.list_items_cache, "list_items.json");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REFILE_TEST_BASE_URL", "https://proxy.example.com/v2");

        let toml_content = r#"
[api]
base_url = "${REFILE_TEST_BASE_URL}"
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.api.base_url, "https://proxy.example.com/v2");

        std::env::remove_var("REFILE_TEST_BASE_URL");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = Settings::from_toml_str("[api]\nbase_url = \"not-a-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_page = Settings::from_toml_str("[fetch]\npage_size = 500\n").unwrap();
        assert!(bad_page.validate().is_err());

        let empty_path = Settings::from_toml_str("[files]\nskipped = \"\"\n").unwrap();
        assert!(empty_path.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_or_default_reads_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            "[fetch]\npage_size = 50\n\n[files]\nskipped = \"state/skipped.json\"\n",
        )
        .unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let settings = Settings::load_or_default(&storage).await.unwrap();

        assert_eq!(settings.fetch.page_size, 50);
        assert_eq!(settings.files.skipped, "state/skipped.json");
        assert_eq!(settings.files.categorized, "categorized_venues.json");
        assert!(settings.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_or_default_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let settings = Settings::load_or_default(&storage).await.unwrap();

        assert_eq!(settings.fetch.page_size, MAX_PAGE_SIZE);
        assert_eq!(settings.api.base_url, "https://api.foursquare.com/v2");
    }

    #[tokio::test]
    async fn test_load_or_default_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "[fetch\npage_size =").unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = Settings::load_or_default(&storage).await.unwrap_err();
        assert!(matches!(err, RefileError::ConfigError { .. }));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Settings::from_toml_str("[api\nbase_url =").unwrap_err();
        assert!(matches!(err, RefileError::ConfigError { .. }));
    }
}
