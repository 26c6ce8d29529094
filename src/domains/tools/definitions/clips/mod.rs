mod create_clip;

pub use create_clip::{CreateClipParams, CreateClipTool};
