mod r2_public_url;

pub use r2_public_url::{GetR2PublicUrlParams, GetR2PublicUrlTool};
