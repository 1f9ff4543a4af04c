//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use scrolldoc_static::StaticBuilder;

use crate::commands::readme;
use crate::config::load_config;

/// Run the build command.
///
/// When a `[readme]` table is configured, the index page is regenerated from
/// the README before building.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;

    if let Some(readme_config) = &file_config.readme {
        readme::generate(
            &file_config.resolve(&readme_config.input),
            &file_config.src_dir().join(&readme_config.output),
            &file_config.page_header(readme_config),
        )?;
    }

    let config = file_config.build_config(output, minify);
    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages with {} sections in {}ms",
        result.pages,
        result.sections,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
