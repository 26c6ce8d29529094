//! Secret sources that can be given directly or through a file.
//!
//! Deployments commonly mount secrets as files (Docker/Kubernetes secrets)
//! instead of exporting them. An [`EnvOrFile`] captures both forms for one
//! secret: the direct value wins, the file is only read when no usable value
//! is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A secret configured as a direct value and/or a path to a file holding it.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EnvOrFile {
    /// Name of the variable holding the value directly (used in messages).
    pub var: String,

    /// Direct value, already trimmed. `None` when unset or blank.
    #[serde(skip_serializing)]
    pub value: Option<String>,

    /// Name of the variable holding the file path (used in messages).
    pub file_var: String,

    /// Path to a file containing the value.
    pub file: Option<PathBuf>,
}

/// Failure to read a file-backed secret.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read {var} ({path}): {source}")]
pub struct SecretFileError {
    pub var: String,
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

impl EnvOrFile {
    /// Create a source for `var` with its `{var}_FILE` companion.
    pub fn new(var: impl Into<String>) -> Self {
        let var = var.into();
        Self {
            file_var: format!("{var}_FILE"),
            var,
            value: None,
            file: None,
        }
    }

    /// Set the direct value. Blank values are treated as unset.
    pub fn with_value(mut self, value: Option<impl Into<String>>) -> Self {
        self.value = value.and_then(|v| non_blank(&v.into()));
        self
    }

    /// Set the file path. Blank paths are treated as unset.
    pub fn with_file(mut self, file: Option<impl Into<PathBuf>>) -> Self {
        self.file = file
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty());
        self
    }

    /// Capture both variables from a lookup function.
    pub fn from_lookup(var: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let source = Self::new(var);
        let file = lookup(&source.file_var).and_then(|p| non_blank(&p));
        let value = lookup(var);
        source.with_value(value).with_file(file)
    }

    /// Whether either form is configured.
    pub fn is_configured(&self) -> bool {
        self.value.is_some() || self.file.is_some()
    }

    /// Read the secret.
    ///
    /// Returns `Ok(None)` when neither form yields a non-empty value. An
    /// empty file counts as absent; an unreadable file is an error.
    pub fn read(&self) -> Result<Option<String>, SecretFileError> {
        if let Some(value) = &self.value {
            return Ok(Some(value.clone()));
        }

        match &self.file {
            Some(path) => read_trimmed(path)
                .map(|contents| non_blank(&contents))
                .map_err(|source| SecretFileError {
                    var: self.file_var.clone(),
                    path: path.display().to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for EnvOrFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvOrFile")
            .field("var", &self.var)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("file_var", &self.file_var)
            .field("file", &self.file)
            .finish()
    }
}

/// Read a file and trim surrounding whitespace.
pub fn read_trimmed(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path).map(|s| s.trim().to_string())
}

/// Trim a value, returning `None` for empty results.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_direct_value_wins_over_file() {
        let source = EnvOrFile::new("SECRET")
            .with_value(Some("direct"))
            .with_file(Some("/nonexistent/secret"));
        assert_eq!(source.read().unwrap().as_deref(), Some("direct"));
    }

    #[test]
    fn test_blank_value_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret");
        std::fs::write(&path, "  from-file\n").unwrap();

        let source = EnvOrFile::new("SECRET")
            .with_value(Some("   "))
            .with_file(Some(path));
        assert_eq!(source.read().unwrap().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret");
        std::fs::write(&path, "\n\n").unwrap();

        let source = EnvOrFile::new("SECRET").with_file(Some(path));
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_error() {
        let source = EnvOrFile::new("SECRET").with_file(Some("/nonexistent/secret"));
        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("SECRET_FILE"));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [("TOKEN", "abc"), ("TOKEN_FILE", " ")].into();
        let source = EnvOrFile::from_lookup("TOKEN", |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(source.value.as_deref(), Some("abc"));
        assert!(source.file.is_none());
        assert!(source.is_configured());
    }

    #[test]
    fn test_debug_redacts_value() {
        let source = EnvOrFile::new("TOKEN").with_value(Some("super_secret_key"));
        let debug_str = format!("{:?}", source);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
