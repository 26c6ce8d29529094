mod list_api_keys;

pub use list_api_keys::{ListApiKeysParams, ListApiKeysTool};
