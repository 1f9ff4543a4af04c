//! Initialize a documentation site next to the config file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing scrolldoc...");

    let site_dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(site_dir).context("Failed to create site directory")?;

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    let styles_path = site_dir.join("styles.css");
    if !styles_path.exists() || yes {
        fs::write(&styles_path, DEFAULT_STYLES).context("Failed to write styles.css")?;
        tracing::info!("Created {}", styles_path.display());
    }

    let layouts_dir = site_dir.join("_layouts");
    if !layouts_dir.exists() {
        fs::create_dir_all(&layouts_dir).context("Failed to create _layouts directory")?;
    }

    let layout_path = layouts_dir.join("page.html");
    if !layout_path.exists() || yes {
        fs::write(&layout_path, STARTER_LAYOUT).context("Failed to write starter layout")?;
        tracing::info!("Created {}", layout_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'scrolldoc build' to generate the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# scrolldoc configuration

[site]
# Source directory for pages and copied files
src = "."

# Output directory for the built site
dest = "../docs"

# Site title
title = "My Project"

# Base URL (for deployment under a sub-path, e.g. "/my-project/")
base_url = "/"

# Public URL of the deployed site, enables sitemap.xml
# location = "https://example.github.io/my-project/"

# Repository linked from the sidebar
# repository = "https://github.com/example/my-project"

# Custom layout templates
layouts = "_layouts"

# Files copied into the output as-is
copy = ["styles.css"]

# Stylesheets linked from every page
styles = ["styles.css"]

[readme]
# README turned into the index page on every build
input = "../README.md"
output = "index.md"
# Built-in layout; "page.html" uses the starter in _layouts
layout = "layout.html"

[navigation]
# Wheel delta needed to change section
scroll_threshold = 50.0
# Swipe distance needed to change section
swipe_threshold = 50.0
# Milliseconds a transition blocks further navigation
settle_ms = 600

[build]
minify = true
"#;

const DEFAULT_STYLES: &str = r#"/* Site overrides, loaded after the built-in theme */
:root {
  --primary: #0969da;
}
"#;

const STARTER_LAYOUT: &str = r#"{% extends "layout.html" %}

{% block body %}
{{ super() }}
<footer class="site-footer">{{ site_title }}</footer>
{% endblock %}
"#;
