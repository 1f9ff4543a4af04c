//! Front matter extraction, parsing, and injection.

use serde::{Deserialize, Serialize};

/// Parsed front matter from a markdown page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title (required)
    pub title: String,

    /// Layout template the page is rendered with
    #[serde(default)]
    pub layout: Option<String>,

    /// Page description for SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Order in the section index (lower = first)
    #[serde(default)]
    pub order: Option<i32>,

    /// Whether the page is listed in the section index
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Custom output path override
    #[serde(default)]
    pub slug: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            layout: None,
            description: None,
            order: None,
            nav: true,
            slug: None,
        }
    }
}

/// Header written in front of a README to turn it into a site page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageHeader {
    pub title: String,
    pub layout: String,
}

/// Extract front matter from markdown content.
///
/// Returns the parsed front matter and the remaining content after the block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = &after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Prepend a front matter block to `body`.
///
/// The body is kept verbatim, separated from the block by one blank line.
pub fn inject_frontmatter(header: &PageHeader, body: &str) -> Result<String, FrontmatterError> {
    let yaml =
        serde_yaml::to_string(header).map_err(|e| FrontmatterError::Serialize(e.to_string()))?;

    Ok(format!("---\n{yaml}---\n\n{body}"))
}

/// Errors that can occur when handling front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Failed to serialize frontmatter: {0}")]
    Serialize(String),
}
