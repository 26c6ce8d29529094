//! Cloudflare R2 object storage, reached through its S3-compatible API.

mod error;
mod r2;
pub mod signing;

pub use error::StorageError;
pub use r2::{R2Client, R2ObjectInfo, encode_key, has_dot_segment, object_metadata, public_url};
