mod embed;
mod pipeline;

pub use embed::build_embed_config;
pub use pipeline::build_pipeline_config;
