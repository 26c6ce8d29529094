//! Webhook management tools.

mod delete;
mod list;
mod register;
mod test_hook;

pub use delete::{DeleteWebhookParams, DeleteWebhookTool};
pub use list::{ListWebhooksParams, ListWebhooksTool};
pub use register::{RegisterWebhookParams, RegisterWebhookTool};
pub use test_hook::{TestWebhookParams, TestWebhookTool};
