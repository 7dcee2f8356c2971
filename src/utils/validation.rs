use crate::utils::error::{RefileError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> RefileError {
    RefileError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The API base must be an absolute http(s) URL.
pub fn validate_url(field: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, raw, format!("Unsupported URL scheme: {}", scheme))),
    }
}

/// A document path under the data directory: non-empty, no NUL bytes, and
/// naming a file rather than a directory.
pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    if path.ends_with('/') || path.ends_with('\\') {
        return Err(invalid(field, path, "Path must name a file, not a directory"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://api.foursquare.com/v2").is_ok());
        assert!(validate_url("api.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "not a url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("files.token", "oauth_token.json").is_ok());
        assert!(validate_path("files.token", "state/venues.json").is_ok());
        assert!(validate_path("files.token", "").is_err());
        assert!(validate_path("files.token", "bad\0name.json").is_err());
        assert!(validate_path("files.token", "state/").is_err());
    }

    #[test]
    fn test_validate_range_reports_field() {
        assert!(validate_range("fetch.page_size", 200, 1, 200).is_ok());
        assert!(validate_range("fetch.page_size", 201, 1, 200).is_err());

        match validate_range("fetch.page_size", 0, 1, 200) {
            Err(RefileError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "fetch.page_size");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("access_token", "abc").is_ok());
        assert!(validate_non_empty_string("access_token", "  ").is_err());
    }
}
