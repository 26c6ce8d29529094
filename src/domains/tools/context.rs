//! Shared state handed to every tool call.

use std::sync::Arc;
use tracing::debug;

use crate::core::config::Config;
use crate::core::http_client::{HttpExecutor, ReqwestExecutor, ResilientTransport, RetryPolicy};
use crate::domains::podhome::{CredentialResolver, PodhomeClient, PodhomeError};
use crate::domains::storage::{R2Client, StorageError};

use super::definitions::common::ApiKeyOverride;

/// Immutable configuration plus the executor all outbound calls share.
///
/// Cheap to clone. Nothing here changes between calls.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    executor: Arc<dyn HttpExecutor>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, executor: Arc<dyn HttpExecutor>) -> Self {
        Self { config, executor }
    }

    /// Context backed by a pooled `reqwest` client.
    pub fn with_reqwest(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        Ok(Self::new(config, Arc::new(ReqwestExecutor::new()?)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_arc(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Transport for Podhome calls, retrying per the configured policy.
    pub fn transport(&self) -> ResilientTransport {
        ResilientTransport::new(
            self.executor.clone(),
            RetryPolicy::from_config(&self.config.http),
        )
    }

    /// Transport for object storage calls: one attempt, same deadline.
    pub fn storage_transport(&self) -> ResilientTransport {
        ResilientTransport::new(
            self.executor.clone(),
            RetryPolicy::single_attempt(self.config.http.attempt_timeout()),
        )
    }

    /// Resolve the API key for this call and bind a client to it.
    pub fn podhome_client(&self, keys: &ApiKeyOverride) -> Result<PodhomeClient, PodhomeError> {
        let resolved = CredentialResolver::new(&self.config.podhome.credentials).resolve(
            keys.podhome_api_key.as_deref(),
            keys.podhome_api_key_name.as_deref(),
        )?;
        debug!(source = ?resolved.source, "Resolved Podhome API key");

        Ok(PodhomeClient::new(
            self.config.podhome.base_url.as_str(),
            resolved.key,
            self.transport(),
        ))
    }

    pub fn r2_client(&self) -> Result<R2Client, StorageError> {
        R2Client::from_config(&self.config.storage, self.storage_transport())
    }
}
