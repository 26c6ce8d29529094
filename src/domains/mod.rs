//! Domains module containing business logic organized by bounded contexts.
//!
//! - **podhome**: Podhome API client, key resolution and result formatting
//! - **storage**: Cloudflare R2 object lookup
//! - **tools**: MCP tools that expose both to clients

pub mod podhome;
pub mod storage;
pub mod tools;
