//! Generate the index page from a README.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scrolldoc_mdx::{inject_frontmatter, PageHeader};

use crate::config::load_config;

/// Run the readme command.
pub async fn run(config_path: &Path, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let readme = config.readme_or_default();

    let input = input.unwrap_or_else(|| config.resolve(&readme.input));
    let output = output.unwrap_or_else(|| config.src_dir().join(&readme.output));

    generate(&input, &output, &config.page_header(&readme))
}

/// Write `input` to `output` with a front matter block prepended.
pub fn generate(input: &Path, output: &Path, header: &PageHeader) -> Result<()> {
    let body = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let page = inject_frontmatter(header, &body)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(output, page).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("Generated {} from {}", output.display(), input.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prepends_front_matter() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("README.md");
        let output = temp.path().join("website/index.md");
        fs::write(&input, "# cragents\n").unwrap();

        let header = PageHeader {
            title: "cragents".to_string(),
            layout: "layout.html".to_string(),
        };
        generate(&input, &output, &header).unwrap();

        let page = fs::read_to_string(&output).unwrap();
        assert_eq!(
            page,
            "---\ntitle: cragents\nlayout: layout.html\n---\n\n# cragents\n"
        );
    }

    #[test]
    fn missing_readme_is_an_error() {
        let temp = tempdir().unwrap();
        let header = PageHeader {
            title: "x".to_string(),
            layout: "layout.html".to_string(),
        };

        let result = generate(
            &temp.path().join("README.md"),
            &temp.path().join("index.md"),
            &header,
        );

        assert!(result.is_err());
    }
}
