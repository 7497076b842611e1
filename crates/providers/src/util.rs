//! Shared utility functions for the HTTP adapters.

use nx_domain::config::AuthConfig;
use nx_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Resolve an API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext — warn)
/// 2. `env` field (reads environment variable; blank values count as unset)
/// 3. Error
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key' — prefer 'env' instead"
        );
        return Ok(key.clone());
    }

    if let Some(ref env_var) = auth.env {
        return match std::env::var(env_var) {
            Ok(val) if !val.trim().is_empty() => Ok(val),
            _ => Err(Error::Auth(format!(
                "environment variable '{env_var}' not set or empty"
            ))),
        };
    }

    Err(Error::Auth(
        "no API key configured: set 'key' or 'env' in the auth section".into(),
    ))
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_key_plaintext() {
        let auth = AuthConfig {
            key: Some("gsk-test-123".into()),
            env: Some("NX_TEST_SHOULD_NOT_BE_READ".into()),
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "gsk-test-123");
    }

    #[test]
    fn resolve_api_key_env_var() {
        let var_name = "NX_TEST_RESOLVE_ENV_KEY_4411";
        std::env::set_var(var_name, "env-secret-value");
        let auth = AuthConfig::from_env(var_name);
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_blank_env_counts_as_missing() {
        let var_name = "NX_TEST_RESOLVE_BLANK_KEY_4412";
        std::env::set_var(var_name, "   ");
        let err = resolve_api_key(&AuthConfig::from_env(var_name)).unwrap_err();
        assert!(err.to_string().contains(var_name));
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_env_var_missing() {
        let auth = AuthConfig::from_env("NX_TEST_NONEXISTENT_VAR_8888");
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("NX_TEST_NONEXISTENT_VAR_8888"));
    }

    #[test]
    fn resolve_api_key_no_config() {
        let err = resolve_api_key(&AuthConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://api.groq.com/openai/v1/", "/chat/completions"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(join_url("http://h", "search"), "http://h/search");
    }
}
