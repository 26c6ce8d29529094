//! Cloudflare R2 object lookup.
//!
//! Confirms an object exists with a signed `HEAD` request and derives the
//! URL it is publicly served from.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{CONTENT_LENGTH, HeaderMap, LAST_MODIFIED};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use super::error::StorageError;
use super::signing::{SigningCredentials, sign_request};
use crate::core::config::StorageConfig;
use crate::core::http_client::{HttpRequest, ResilientTransport};
use crate::core::secret::{EnvOrFile, non_blank};

const R2_REGION: &str = "auto";
const S3_SERVICE: &str = "s3";

/// A located object and where to fetch it from.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct R2ObjectInfo {
    pub public_url: String,
    pub bucket: String,
    pub object_key: String,
    pub size_bytes: u64,
    /// ISO-8601, UTC, millisecond precision.
    pub last_modified: String,
}

pub struct R2Client {
    account_id: String,
    access_key_id: String,
    secret_access_key: String,
    public_domain: Option<String>,
    endpoint: String,
    transport: ResilientTransport,
}

impl std::fmt::Debug for R2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("R2Client")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("public_domain", &self.public_domain)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn required(source: &EnvOrFile) -> Result<String, StorageError> {
    source
        .read()?
        .ok_or_else(|| StorageError::missing(source.var.clone()))
}

impl R2Client {
    /// Read the account and key pair. Fails when any of them is missing.
    pub fn from_config(
        config: &StorageConfig,
        transport: ResilientTransport,
    ) -> Result<Self, StorageError> {
        let account_id = required(&config.account_id)?;
        let access_key_id = required(&config.access_key_id)?;
        let secret_access_key = required(&config.secret_access_key)?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.r2.cloudflarestorage.com", account_id))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            account_id,
            access_key_id,
            secret_access_key,
            public_domain: config.public_domain.clone(),
            endpoint,
            transport,
        })
    }

    /// Look up `bucket/object_key` and build its public URL.
    ///
    /// `custom_domain` takes precedence over the configured public domain.
    pub async fn get_public_url(
        &self,
        bucket: &str,
        object_key: &str,
        custom_domain: Option<&str>,
    ) -> Result<R2ObjectInfo, StorageError> {
        let url = self.object_url(bucket, object_key)?;
        let credentials = SigningCredentials {
            access_key_id: &self.access_key_id,
            secret_access_key: &self.secret_access_key,
            region: R2_REGION,
            service: S3_SERVICE,
        };

        let mut request = HttpRequest::head(url.as_str());
        for (name, value) in sign_request("HEAD", &url, &credentials, Utc::now())? {
            request = request.header(name, value);
        }

        debug!("R2 HEAD {}", url);
        let response = self.transport.send(&request).await?;

        match response.status {
            200..=299 => {}
            404 => {
                return Err(StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: object_key.to_string(),
                });
            }
            status => return Err(StorageError::Remote { status }),
        }

        let (size_bytes, last_modified) = object_metadata(&response.headers);
        let domain = custom_domain
            .and_then(non_blank)
            .or_else(|| self.public_domain.clone());
        let public_url = public_url(domain.as_deref(), bucket, &self.account_id, object_key);

        info!("Resolved R2 object {}/{} ({} bytes)", bucket, object_key, size_bytes);

        Ok(R2ObjectInfo {
            public_url,
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
            size_bytes,
            last_modified,
        })
    }

    fn object_url(&self, bucket: &str, object_key: &str) -> Result<Url, StorageError> {
        if has_dot_segment(bucket) || has_dot_segment(object_key) {
            return Err(StorageError::DotSegment(format!("{}/{}", bucket, object_key)));
        }
        let raw = format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(bucket),
            encode_key(object_key)
        );
        Url::parse(&raw).map_err(|e| StorageError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }
}

/// URI-encode each `/`-separated segment of an object key.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// True when any `/`-separated segment is `.` or `..`.
pub fn has_dot_segment(key: &str) -> bool {
    key.split('/').any(|segment| segment == "." || segment == "..")
}

/// `https://{domain}/{key}` with a domain, else the bucket's R2 URL.
pub fn public_url(domain: Option<&str>, bucket: &str, account_id: &str, object_key: &str) -> String {
    match domain {
        Some(domain) => format!("https://{}/{}", domain.trim_end_matches('/'), object_key),
        None => format!(
            "https://{}.{}.r2.cloudflarestorage.com/{}",
            bucket, account_id, object_key
        ),
    }
}

/// Size and last-modified time from HEAD response headers.
///
/// A missing size reads as 0; a missing or unparseable date as now.
pub fn object_metadata(headers: &HeaderMap) -> (u64, String) {
    let size = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    let modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    (size, modified.to_rfc3339_opts(SecondsFormat::Millis, true))
}
