//! Bearer token providers.
//!
//! The executor asks its provider for the current token on every call and
//! never caches, validates or refreshes what it gets back.

use std::path::{Path, PathBuf};

/// Environment variable read by [`EnvToken::default`]
pub const DEFAULT_TOKEN_VAR: &str = "API_TOKEN";

/// Key looked up by [`FileStore`] unless another one is given
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Supplies the current bearer token, if any.
pub trait TokenProvider: Send + Sync {
    /// Returns the token to place after `Bearer ` in the `Authorization` header.
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Format an `Authorization` header value.
///
/// An absent token is rendered as the literal `null`.
pub fn bearer(token: Option<&str>) -> String {
    format!("Bearer {}", token.unwrap_or("null"))
}

/// A fixed token, possibly absent
#[derive(Debug, Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    /// Create a provider that always returns `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Create a provider that never has a token
    pub fn none() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Reads the token from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from the variable named `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable being read
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Persisted key/value store backed by a JSON object file.
///
/// The file is re-read on every lookup so that tokens written by another
/// process are picked up immediately.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    key: String,
}

impl FileStore {
    /// Look up [`DEFAULT_TOKEN_KEY`] in the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// Use a different key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a string value from the store
    pub fn get(&self, key: &str) -> Option<String> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::trace!(path = %self.path.display(), error = %e, "token store not readable");
                return None;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "token store is not valid JSON");
                return None;
            }
        };
        value.get(key)?.as_str().map(str::to_string)
    }
}

impl TokenProvider for FileStore {
    fn token(&self) -> Option<String> {
        self.get(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_token_renders_null() {
        assert_eq!(bearer(None), "Bearer null");
        assert_eq!(bearer(Some("abc")), "Bearer abc");
    }

    #[test]
    fn closures_are_providers() {
        let provider = || Some("from-closure".to_string());
        assert_eq!(provider.token().as_deref(), Some("from-closure"));
        assert_eq!(StaticToken::none().token(), None);
        assert_eq!(StaticToken::new("t").token().as_deref(), Some("t"));
    }

    #[test]
    fn env_token_reads_on_every_call() {
        let provider = EnvToken::new("JSONFETCH_TEST_TOKEN_VAR");
        assert_eq!(provider.token(), None);
        // SAFETY: no other test touches this variable.
        unsafe { std::env::set_var("JSONFETCH_TEST_TOKEN_VAR", "first") };
        assert_eq!(provider.token().as_deref(), Some("first"));
        unsafe { std::env::set_var("JSONFETCH_TEST_TOKEN_VAR", "second") };
        assert_eq!(provider.token().as_deref(), Some("second"));
        unsafe { std::env::remove_var("JSONFETCH_TEST_TOKEN_VAR") };
    }

    #[test]
    fn file_store_lookups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token":"abc","count":3}}"#).unwrap();

        let store = FileStore::new(file.path());
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.clone().with_key("count").token(), None);

        std::fs::write(file.path(), r#"{"token":"rotated"}"#).unwrap();
        assert_eq!(store.token().as_deref(), Some("rotated"));

        std::fs::write(file.path(), "garbage").unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn file_store_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope.json"));
        assert_eq!(store.token(), None);
    }
}
