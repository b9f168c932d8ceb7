use conformer_forge::EmbedConfig;

use crate::cli::EmbeddingOptions;

/// Applies command-line overrides on top of `base`.
pub fn build_embed_config(base: EmbedConfig, opts: &EmbeddingOptions) -> EmbedConfig {
    EmbedConfig {
        max_attempts: opts.max_attempts.unwrap_or(base.max_attempts),
        max_iterations: opts.max_iterations.unwrap_or(base.max_iterations),
        force_field_iterations: opts
            .force_field_iterations
            .unwrap_or(base.force_field_iterations),
    }
}
