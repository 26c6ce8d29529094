//! Tool definitions module.
//!
//! One file per tool, grouped by the part of the Podhome API they cover.

pub mod clips;
pub mod common;
pub mod episodes;
pub mod keys;
pub mod storage;
pub mod webhooks;

pub use clips::CreateClipTool;
pub use episodes::{
    CreateEpisodeTool, DeleteEpisodeTool, GetEpisodeTool, ListEpisodesTool, PublishEpisodeTool,
    UpdateEpisodeTool,
};
pub use keys::ListApiKeysTool;
pub use storage::GetR2PublicUrlTool;
pub use webhooks::{DeleteWebhookTool, ListWebhooksTool, RegisterWebhookTool, TestWebhookTool};
