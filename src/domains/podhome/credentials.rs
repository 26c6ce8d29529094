//! Podhome API key resolution.
//!
//! A tool call may carry an explicit key or a key name. Otherwise the key
//! comes from the process configuration, which can hold a single implicit
//! default and/or a keyed mapping (one key per show) assembled from up to
//! three sources:
//!
//! 1. `PODHOME_API_KEYS`: a JSON object of name to key
//! 2. `PODHOME_API_KEYS_FILE`: the same JSON format, read from a file
//! 3. `PODHOME_API_KEYS_DIR`: one key per regular file, named by file stem
//!
//! Later sources overwrite earlier ones on name collision.
//!
//! Resolution order, first match wins:
//!
//! 1. explicit key passed with the call
//! 2. named key, looked up exactly in the mapping (unknown names fail)
//! 3. implicit default (`PODHOME_API_KEY`, then `PODHOME_API_KEY_FILE`)
//! 4. the only entry of a single-entry mapping
//! 5. the mapping entry named `default`
//!
//! Steps 3 to 5 only apply when no name was requested, so a misspelled name
//! never silently falls back to another show's key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::config::PodhomeCredentials;
use crate::core::secret::{SecretFileError, non_blank, read_trimmed};

/// Name of the mapping entry used when several keys exist and none was named.
pub const DEFAULT_KEY_NAME: &str = "default";

const KEYS_JSON_VAR: &str = "PODHOME_API_KEYS";
const KEYS_FILE_VAR: &str = "PODHOME_API_KEYS_FILE";
const KEYS_DIR_VAR: &str = "PODHOME_API_KEYS_DIR";

/// Errors raised before any request is sent because no key could be chosen.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{source_var} is not valid JSON: {message}")]
    InvalidJson { source_var: String, message: String },

    #[error("{source_var} must be a JSON object mapping key names to API keys")]
    NotAnObject { source_var: String },

    #[error("{source_var} entry '{key}' must map a non-empty name to a non-empty string")]
    InvalidValue { source_var: String, key: String },

    #[error("{dir_var} entry '{name}' ({path}) is empty", dir_var = KEYS_DIR_VAR)]
    EmptyDirectoryEntry { name: String, path: String },

    #[error("Failed to read {source_var} ({path}): {source}")]
    Io {
        source_var: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    SecretFile(#[from] SecretFileError),

    #[error("Unknown Podhome API key name '{name}'. Known names: {known}")]
    UnknownName { name: String, known: String },

    #[error(
        "Multiple Podhome API keys are configured ({names}). Pass podhome_api_key_name \
         to choose one, or add a '{default_name}' key",
        default_name = DEFAULT_KEY_NAME
    )]
    Ambiguous { names: String },

    #[error(
        "Podhome API key is required. Pass podhome_api_key, or set PODHOME_API_KEY, \
         PODHOME_API_KEY_FILE, PODHOME_API_KEYS, PODHOME_API_KEYS_FILE or PODHOME_API_KEYS_DIR"
    )]
    Missing,
}

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed explicitly with the call.
    Override,
    /// Looked up by the name passed with the call.
    NamedKey,
    /// `PODHOME_API_KEY` or `PODHOME_API_KEY_FILE`.
    ImplicitDefault,
    /// The only entry of the keyed mapping.
    SingleKey,
    /// The keyed mapping entry named `default`.
    DefaultKey,
}

/// A key chosen for one call.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub key: String,
    pub source: CredentialSource,
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Chooses the API key for a call from the configured sources.
///
/// Performs no network access. File and directory sources are read on every
/// call; nothing is cached.
pub struct CredentialResolver<'a> {
    sources: &'a PodhomeCredentials,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(sources: &'a PodhomeCredentials) -> Self {
        Self { sources }
    }

    /// Resolve the key for a call carrying an optional explicit key and an
    /// optional key name. Blank values count as absent.
    pub fn resolve(
        &self,
        api_key: Option<&str>,
        api_key_name: Option<&str>,
    ) -> Result<ResolvedCredential, CredentialError> {
        if let Some(key) = api_key.and_then(non_blank) {
            debug!("Using explicit Podhome API key override");
            return Ok(ResolvedCredential {
                key,
                source: CredentialSource::Override,
            });
        }

        let mapping = self.keyed_mapping()?;

        if let Some(name) = api_key_name.and_then(non_blank) {
            return match mapping.get(&name) {
                Some(key) => {
                    debug!("Using Podhome API key '{}'", name);
                    Ok(ResolvedCredential {
                        key: key.clone(),
                        source: CredentialSource::NamedKey,
                    })
                }
                None => Err(CredentialError::UnknownName {
                    name,
                    known: join_names(&mapping),
                }),
            };
        }

        if let Some(key) = self.sources.default_key.read()? {
            debug!("Using implicit default Podhome API key");
            return Ok(ResolvedCredential {
                key,
                source: CredentialSource::ImplicitDefault,
            });
        }

        if mapping.len() == 1 {
            if let Some((name, key)) = mapping.iter().next() {
                debug!("Using the only configured Podhome API key '{}'", name);
                return Ok(ResolvedCredential {
                    key: key.clone(),
                    source: CredentialSource::SingleKey,
                });
            }
        }

        if let Some(key) = mapping.get(DEFAULT_KEY_NAME) {
            debug!("Using the '{}' Podhome API key", DEFAULT_KEY_NAME);
            return Ok(ResolvedCredential {
                key: key.clone(),
                source: CredentialSource::DefaultKey,
            });
        }

        if mapping.len() > 1 {
            return Err(CredentialError::Ambiguous {
                names: join_names(&mapping),
            });
        }

        Err(CredentialError::Missing)
    }

    /// Assemble the keyed mapping from all configured sources.
    pub fn keyed_mapping(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let mut mapping = BTreeMap::new();

        if let Some(json) = &self.sources.keys_json {
            mapping.extend(parse_key_map(KEYS_JSON_VAR, json)?);
        }

        if let Some(path) = &self.sources.keys_file {
            let json = read_source(KEYS_FILE_VAR, path)?;
            mapping.extend(parse_key_map(KEYS_FILE_VAR, &json)?);
        }

        if let Some(dir) = &self.sources.keys_dir {
            mapping.extend(read_key_dir(dir)?);
        }

        Ok(mapping)
    }
}

/// Parse a JSON object of name to key. Names and keys are trimmed.
fn parse_key_map(source_var: &str, json: &str) -> Result<Vec<(String, String)>, CredentialError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CredentialError::InvalidJson {
            source_var: source_var.to_string(),
            message: e.to_string(),
        })?;

    let object = value.as_object().ok_or_else(|| CredentialError::NotAnObject {
        source_var: source_var.to_string(),
    })?;

    object
        .iter()
        .map(|(name, key)| {
            let entry = non_blank(name).zip(key.as_str().and_then(non_blank));
            entry.ok_or_else(|| CredentialError::InvalidValue {
                source_var: source_var.to_string(),
                key: name.clone(),
            })
        })
        .collect()
}

/// Read one key per regular file. Entry names are file stems; dotfiles are
/// skipped. Entries are applied in file name order.
fn read_key_dir(dir: &Path) -> Result<Vec<(String, String)>, CredentialError> {
    let io_error = |path: &Path, source: std::io::Error| CredentialError::Io {
        source_var: KEYS_DIR_VAR.to_string(),
        path: path.display().to_string(),
        source,
    };

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_error(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.'))
        })
        .collect();
    files.sort();

    files
        .into_iter()
        .filter_map(|path| {
            let name = path.file_stem()?.to_string_lossy().into_owned();
            Some((name, path))
        })
        .map(|(name, path)| {
            let key = read_trimmed(&path).map_err(|e| io_error(&path, e))?;
            if key.is_empty() {
                return Err(CredentialError::EmptyDirectoryEntry {
                    name,
                    path: path.display().to_string(),
                });
            }
            Ok((name, key))
        })
        .collect()
}

fn read_source(source_var: &str, path: &Path) -> Result<String, CredentialError> {
    std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
        source_var: source_var.to_string(),
        path: path.display().to_string(),
        source,
    })
}

/// Sorted, comma-joined names, or "none".
fn join_names(mapping: &BTreeMap<String, String>) -> String {
    if mapping.is_empty() {
        "none".to_string()
    } else {
        mapping.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
