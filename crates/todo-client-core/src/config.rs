pub const DEFAULT_BACKEND_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_BACKEND_BASE_URL: &str = "TODO_BACKEND_URL";
pub const ENV_BACKEND_BASE_URL_LEGACY: &str = "TODO_API_BASE_URL";
pub const BASE_URL_SOURCE_DEFAULT_LOCAL: &str = "default_local";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
}

/// Resolves the backend base URL from the process environment, returning the
/// normalized URL and the name of the source it came from.
pub fn resolve_backend_base_url() -> Result<(String, &'static str), ConfigError> {
    if let Some(base_url) = env_non_empty(ENV_BACKEND_BASE_URL) {
        return normalize_base_url(&base_url).map(|normalized| (normalized, ENV_BACKEND_BASE_URL));
    }
    if let Some(base_url) = env_non_empty(ENV_BACKEND_BASE_URL_LEGACY) {
        return normalize_base_url(&base_url)
            .map(|normalized| (normalized, ENV_BACKEND_BASE_URL_LEGACY));
    }
    normalize_base_url(DEFAULT_BACKEND_BASE_URL)
        .map(|normalized| (normalized, BASE_URL_SOURCE_DEFAULT_LOCAL))
}

/// Same precedence as [`resolve_backend_base_url`] for hosts whose
/// configuration is baked in at build time (the browser shell).
pub fn resolve_compiled_base_url(compiled: Option<&str>) -> Result<String, ConfigError> {
    match compiled.map(str::trim).filter(|value| !value.is_empty()) {
        Some(base_url) => normalize_base_url(base_url),
        None => normalize_base_url(DEFAULT_BACKEND_BASE_URL),
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn with_env<T>(primary: Option<&str>, legacy: Option<&str>, test: impl FnOnce() -> T) -> T {
        let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous_primary = std::env::var(ENV_BACKEND_BASE_URL).ok();
        let previous_legacy = std::env::var(ENV_BACKEND_BASE_URL_LEGACY).ok();

        set_or_remove(ENV_BACKEND_BASE_URL, primary);
        set_or_remove(ENV_BACKEND_BASE_URL_LEGACY, legacy);

        let result = test();

        set_or_remove(ENV_BACKEND_BASE_URL, previous_primary.as_deref());
        set_or_remove(ENV_BACKEND_BASE_URL_LEGACY, previous_legacy.as_deref());

        result
    }

    fn set_or_remove(key: &str, value: Option<&str>) {
        if let Some(value) = value {
            unsafe { std::env::set_var(key, value) };
        } else {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    fn normalize_base_url_trims_and_drops_trailing_slash() {
        let normalized = normalize_base_url(" https://todos.example.com/ ").expect("valid base url");
        assert_eq!(normalized, "https://todos.example.com");
    }

    #[test]
    fn normalize_base_url_requires_http_scheme() {
        let error = normalize_base_url("todos.example.com").expect_err("expected invalid url");
        assert_eq!(error, ConfigError::InvalidBaseUrl);
    }

    #[test]
    fn normalize_base_url_rejects_missing_host() {
        let error = normalize_base_url("http:///todos").expect_err("expected invalid url");
        assert_eq!(error, ConfigError::InvalidBaseUrl);
        assert_eq!(normalize_base_url("  "), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn resolve_backend_base_url_defaults_local() {
        with_env(None, None, || {
            let (resolved, source) = resolve_backend_base_url().expect("default local url");
            assert_eq!(resolved, DEFAULT_BACKEND_BASE_URL);
            assert_eq!(source, BASE_URL_SOURCE_DEFAULT_LOCAL);
        });
    }

    #[test]
    fn resolve_backend_base_url_prefers_primary_env() {
        with_env(
            Some("https://api.todos.example.com/"),
            Some("https://legacy.example.com"),
            || {
                let (resolved, source) = resolve_backend_base_url().expect("env url");
                assert_eq!(resolved, "https://api.todos.example.com");
                assert_eq!(source, ENV_BACKEND_BASE_URL);
            },
        );
    }

    #[test]
    fn resolve_backend_base_url_uses_legacy_env_when_primary_missing() {
        with_env(None, Some("https://legacy.example.com/"), || {
            let (resolved, source) = resolve_backend_base_url().expect("legacy env url");
            assert_eq!(resolved, "https://legacy.example.com");
            assert_eq!(source, ENV_BACKEND_BASE_URL_LEGACY);
        });
    }

    #[test]
    fn compiled_base_url_falls_back_to_default() {
        assert_eq!(
            resolve_compiled_base_url(None).as_deref(),
            Ok(DEFAULT_BACKEND_BASE_URL)
        );
        assert_eq!(
            resolve_compiled_base_url(Some("http://10.0.0.5:8000/")).as_deref(),
            Ok("http://10.0.0.5:8000")
        );
    }
}
