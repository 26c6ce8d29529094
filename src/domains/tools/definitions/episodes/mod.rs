//! Episode lifecycle tools.

mod create;
mod delete;
mod get;
mod list;
mod publish;
mod update;

pub use create::{CreateEpisodeParams, CreateEpisodeTool};
pub use delete::{DeleteEpisodeParams, DeleteEpisodeTool};
pub use get::{GetEpisodeParams, GetEpisodeTool};
pub use list::{ListEpisodesParams, ListEpisodesTool};
pub use publish::{PublishEpisodeParams, PublishEpisodeTool};
pub use update::{UpdateEpisodeParams, UpdateEpisodeTool};
