//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use scrolldoc_mdx::{parse_markdown, Block, Frontmatter, ParsedDoc};
use scrolldoc_nav::{partition, NavConfig, Navigator, Partition};

use crate::assets::AssetPipeline;
use crate::templates::{Context, SectionView, SidebarEntry, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source directory holding markdown pages and copied files
    pub src_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Directory with custom layout templates
    pub layouts_dir: Option<PathBuf>,

    /// Files or directories under `src_dir` copied verbatim into the output
    pub copy: Vec<String>,

    /// Stylesheets linked from every page, relative to `base_url`
    pub styles: Vec<String>,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Public URL of the deployed site, used for the sitemap
    pub location: Option<String>,

    /// Repository linked from the sidebar
    pub repository: Option<String>,

    /// Site title, also the sidebar heading for pages without a title
    pub title: String,

    /// Gesture thresholds handed to the browser runtime
    pub navigation: NavConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("."),
            output_dir: PathBuf::from("dist"),
            layouts_dir: None,
            copy: vec![],
            styles: vec![],
            minify: true,
            base_url: "/".to_string(),
            location: None,
            repository: None,
            title: "Documentation".to_string(),
            navigation: NavConfig::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of sections across all pages
    pub sections: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read source: {0}")]
    ReadError(String),

    #[error("Failed to parse markdown: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Source file path
    source_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Parsed document
    doc: ParsedDoc,
}

impl PageInfo {
    fn order(&self) -> i32 {
        self.doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.order)
            .unwrap_or(999)
    }
}

/// Entry of `sections.json`.
#[derive(Debug, Clone, Serialize)]
struct PageSummary {
    title: String,
    url: String,
    sections: Vec<SectionSummary>,

    /// Front matter `nav`; unlisted pages are built but left out of the index
    #[serde(skip)]
    listed: bool,
}

#[derive(Debug, Clone, Serialize)]
struct SectionSummary {
    id: String,
    title: String,
    url: String,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let templates = match &config.layouts_dir {
            Some(dir) if dir.is_dir() => {
                tracing::info!("Loading layouts from {}", dir.display());
                TemplateEngine::with_layouts(dir)
            }
            Some(dir) => {
                tracing::warn!("Layouts directory not found: {}", dir.display());
                TemplateEngine::new()
            }
            None => TemplateEngine::new(),
        };

        Self { config, templates }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Ensure output directory exists
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages = self.discover_pages()?;

        // Render pages in parallel
        let summaries: Vec<PageSummary> = pages
            .par_iter()
            .map(|page| self.build_page(page))
            .collect::<Result<Vec<_>, BuildError>>()?;

        self.generate_assets()?;
        self.copy_files()?;
        self.generate_section_index(&summaries)?;

        if let Some(location) = &self.config.location {
            self.generate_sitemap(location, &pages)?;
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: summaries.len(),
            sections: summaries.iter().map(|s| s.sections.len()).sum(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all markdown pages in the source directory.
    ///
    /// Hidden entries, entries starting with `_`, and the output directory
    /// itself are skipped.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let mut pages = Vec::new();

        if !self.config.src_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Source directory not found: {}",
                self.config.src_dir.display()
            )));
        }

        let output_dir = fs::canonicalize(&self.config.output_dir).ok();

        for entry in WalkDir::new(&self.config.src_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_ignored(e, output_dir.as_deref()))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_markdown(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path
                .strip_prefix(&self.config.src_dir)
                .unwrap_or(path)
                .to_path_buf();

            let output_path = self.calculate_output_path(&relative_path, &doc.frontmatter);

            pages.push(PageInfo {
                source_path: path.to_path_buf(),
                output_path,
                doc,
            });
        }

        // Sort by order from frontmatter, then by path for stable output
        pages.sort_by(|a, b| {
            a.order()
                .cmp(&b.order())
                .then_with(|| a.source_path.cmp(&b.source_path))
        });

        Ok(pages)
    }

    /// Calculate output path for a page.
    fn calculate_output_path(&self, relative: &Path, frontmatter: &Option<Frontmatter>) -> PathBuf {
        // Check for slug override
        if let Some(fm) = frontmatter {
            if let Some(slug) = &fm.slug {
                return self
                    .config
                    .output_dir
                    .join(slug.trim_matches('/'))
                    .join("index.html");
            }
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let parent = relative.parent().unwrap_or(Path::new(""));

        if stem == "index" {
            // index.md -> dest/index.html
            self.config.output_dir.join(parent).join("index.html")
        } else {
            // guide.md -> dest/guide/index.html
            self.config
                .output_dir
                .join(parent)
                .join(stem)
                .join("index.html")
        }
    }

    /// Route of an output page relative to the site root ("" or "guide/").
    fn route(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.output_dir).unwrap_or(path);

        let route = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        if route.is_empty() {
            route
        } else {
            format!("{}/", route)
        }
    }

    /// Convert output path to URL.
    fn path_to_url(&self, path: &Path) -> String {
        format!("{}{}", self.config.base_url, self.route(path))
    }

    /// Build a single page.
    fn build_page(&self, page: &PageInfo) -> Result<PageSummary, BuildError> {
        let sections = partition(&page.doc.blocks);
        let navigator = Navigator::for_partition(&sections, self.config.navigation);

        let heading = sections
            .heading()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.title.clone());

        let fm = page.doc.frontmatter.as_ref();
        let title = fm
            .map(|f| f.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| heading.clone());

        let context = Context {
            title: title.clone(),
            site_title: self.config.title.clone(),
            description: fm.and_then(|f| f.description.clone()),
            heading,
            sidebar: sidebar_entries(&sections, &navigator),
            sections: section_views(&sections, &navigator),
            repository: self.config.repository.clone(),
            base_url: self.config.base_url.clone(),
            styles: self
                .config
                .styles
                .iter()
                .map(|s| format!("{}{}", self.config.base_url, s.trim_start_matches('/')))
                .collect(),
            navigation: self.config.navigation,
        };

        let layout = self
            .templates
            .resolve_layout(fm.and_then(|f| f.layout.as_deref()));

        let html = self
            .templates
            .render_page(layout, &context)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&page.output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Rendered {} with {} sections",
            page.source_path.display(),
            sections.len()
        );

        let url = self.path_to_url(&page.output_path);
        Ok(PageSummary {
            title,
            sections: sections
                .sections
                .iter()
                .map(|s| SectionSummary {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    url: format!("{}#{}", url, s.id),
                })
                .collect(),
            url,
            listed: fm.map_or(true, |f| f.nav),
        })
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = self.maybe_minify(AssetPipeline::generate_css());
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn maybe_minify(&self, css: String) -> String {
        if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        }
    }

    /// Copy configured files and directories into the output root.
    fn copy_files(&self) -> Result<(), BuildError> {
        for entry in &self.config.copy {
            let source = self.config.src_dir.join(entry);
            if !source.exists() {
                tracing::warn!("Copy target not found: {}", source.display());
                continue;
            }

            for file in WalkDir::new(&source)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let relative = file
                    .path()
                    .strip_prefix(&self.config.src_dir)
                    .unwrap_or(file.path());
                self.copy_file(file.path(), &self.config.output_dir.join(relative))?;
            }

            tracing::info!("Copied {}", entry);
        }

        Ok(())
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> Result<(), BuildError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let is_css = source.extension().and_then(|e| e.to_str()) == Some("css");
        if is_css && self.config.minify {
            let css = fs::read_to_string(source).map_err(|e| {
                BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
            })?;
            fs::write(dest, self.maybe_minify(css))
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
        } else {
            fs::copy(source, dest).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        Ok(())
    }

    /// Generate the section index.
    fn generate_section_index(&self, summaries: &[PageSummary]) -> Result<(), BuildError> {
        let listed: Vec<&PageSummary> = summaries.iter().filter(|s| s.listed).collect();
        let json = serde_json::to_string_pretty(&listed)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("sections.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, location: &str, pages: &[PageInfo]) -> Result<(), BuildError> {
        let root = location.trim_end_matches('/');

        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                let loc = format!("{}/{}", root, self.route(&page.output_path));
                format!("  <url>\n    <loc>{}</loc>\n  </url>", escape_xml(&loc))
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", root);
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_ignored(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_str().unwrap_or("");
    if name.starts_with('.') || name.starts_with('_') {
        return true;
    }

    entry.file_type().is_dir()
        && output_dir.is_some_and(|out| fs::canonicalize(entry.path()).is_ok_and(|p| p == out))
}

fn sidebar_entries(sections: &Partition<&Block>, navigator: &Navigator) -> Vec<SidebarEntry> {
    sections
        .sections
        .iter()
        .enumerate()
        .map(|(index, s)| SidebarEntry {
            title: s.title.clone(),
            id: s.id.clone(),
            index,
            active: navigator.is_control_active(index),
        })
        .collect()
}

/// The intro section is rendered with the captured title in front.
fn section_views(sections: &Partition<&Block>, navigator: &Navigator) -> Vec<SectionView> {
    sections
        .sections
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let title = sections.title.filter(|_| s.is_intro());
            let html = title
                .into_iter()
                .chain(s.content.iter().copied())
                .map(|b| b.html.as_str())
                .collect::<Vec<_>>()
                .join("\n");

            SectionView {
                id: s.id.clone(),
                index,
                class: navigator.position(index).class(),
                html,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const README_PAGE: &str = r#"---
title: cragents
layout: layout.html
---

# cragents

Constrained agents.

## Installation

```bash
pip install cragents
```

## Usage

Run it.
"#;

    fn site(src: &Path, out: &Path) -> BuildConfig {
        BuildConfig {
            src_dir: src.to_path_buf(),
            output_dir: out.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_sectioned_page() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("website");
        let out = temp.path().join("docs");

        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.md"), README_PAGE).unwrap();

        let result = StaticBuilder::new(site(&src, &out)).build().await.unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!(result.sections, 3);

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains(r#"<div class="sidebar-title">cragents</div>"#));
        assert!(html.contains(r#"id="section-intro" class="content-section active""#));
        assert!(html.contains(r#"id="section-installation" class="content-section""#));
        assert!(html.contains(r#"data-section="usage" data-index="2""#));
        assert!(html.contains("<h1>cragents</h1>"));
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());
        assert!(!out.join("sitemap.xml").exists());
    }

    #[tokio::test]
    async fn writes_section_index() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::write(temp.path().join("index.md"), README_PAGE).unwrap();
        fs::write(
            temp.path().join("guide.md"),
            "---\ntitle: Guide\norder: 2\n---\n## Setup\n\nSteps.\n",
        )
        .unwrap();

        StaticBuilder::new(site(temp.path(), &out))
            .build()
            .await
            .unwrap();

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("sections.json")).unwrap())
                .unwrap();
        let pages = index.as_array().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0]["url"], "/guide/");
        assert_eq!(pages[0]["sections"][0]["url"], "/guide/#setup");
        assert_eq!(pages[1]["sections"][0]["id"], "intro");
        assert!(out.join("guide/index.html").exists());
    }

    #[tokio::test]
    async fn unlisted_pages_left_out_of_index() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::write(temp.path().join("index.md"), README_PAGE).unwrap();
        fs::write(
            temp.path().join("changelog.md"),
            "---\ntitle: Changelog\nnav: false\n---\n## 0.1.0\n\nFirst.\n",
        )
        .unwrap();

        let result = StaticBuilder::new(site(temp.path(), &out))
            .build()
            .await
            .unwrap();

        assert_eq!(result.pages, 2);
        assert!(out.join("changelog/index.html").exists());

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("sections.json")).unwrap())
                .unwrap();
        let pages = index.as_array().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0]["title"], "cragents");
    }

    #[tokio::test]
    async fn skips_output_and_underscore_dirs() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir_all(out.join("old")).unwrap();
        fs::write(out.join("old/stale.md"), "# Stale").unwrap();
        fs::create_dir_all(temp.path().join("_layouts")).unwrap();
        fs::write(temp.path().join("_layouts/notes.md"), "# Notes").unwrap();
        fs::write(temp.path().join("index.md"), README_PAGE).unwrap();

        let result = StaticBuilder::new(site(temp.path(), &out))
            .build()
            .await
            .unwrap();

        assert_eq!(result.pages, 1);
    }

    #[tokio::test]
    async fn copies_files_and_writes_sitemap() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::write(temp.path().join("index.md"), README_PAGE).unwrap();
        fs::write(temp.path().join("styles.css"), ".a {\n  color: red;\n}\n").unwrap();
        fs::write(temp.path().join("favicon.ico"), [0u8, 1, 2]).unwrap();

        let config = BuildConfig {
            copy: vec![
                "styles.css".to_string(),
                "favicon.ico".to_string(),
                "missing.png".to_string(),
            ],
            styles: vec!["styles.css".to_string()],
            location: Some("https://g-eoj.github.io/cragents/".to_string()),
            ..site(temp.path(), &out)
        };

        StaticBuilder::new(config).build().await.unwrap();

        let css = fs::read_to_string(out.join("styles.css")).unwrap();
        assert!(!css.contains('\n'));
        assert_eq!(fs::read(out.join("favicon.ico")).unwrap(), vec![0u8, 1, 2]);

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://g-eoj.github.io/cragents/</loc>"));

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("styles.css"));
    }

    #[tokio::test]
    async fn sitemap_locations_are_escaped() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::write(temp.path().join("index.md"), README_PAGE).unwrap();

        let config = BuildConfig {
            location: Some("https://example.com/docs?a=1&b=<2>".to_string()),
            ..site(temp.path(), &out)
        };
        StaticBuilder::new(config).build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/docs?a=1&amp;b=&lt;2&gt;/</loc>"));
        assert!(!sitemap.contains("&b="));
    }

    #[tokio::test]
    async fn custom_layout_from_front_matter() {
        let temp = tempdir().unwrap();
        let layouts = temp.path().join("_layouts");
        let out = temp.path().join("dist");
        fs::create_dir_all(&layouts).unwrap();
        fs::write(
            layouts.join("bare.html"),
            "{% for s in sections %}[{{ s.id }}]{% endfor %}",
        )
        .unwrap();
        fs::write(
            temp.path().join("index.md"),
            "---\ntitle: Bare\nlayout: bare.html\n---\n## One\n## Two\n",
        )
        .unwrap();

        let config = BuildConfig {
            layouts_dir: Some(layouts),
            ..site(temp.path(), &out)
        };
        StaticBuilder::new(config).build().await.unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert_eq!(html, "[one][two]");
    }

    #[tokio::test]
    async fn errors_on_missing_source() {
        let temp = tempdir().unwrap();

        let result = StaticBuilder::new(site(&temp.path().join("nope"), &temp.path().join("out")))
            .build()
            .await;

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[test]
    fn intro_view_leads_with_title() {
        let doc = parse_markdown(README_PAGE).unwrap();
        let sections = partition(&doc.blocks);
        let mut navigator = Navigator::for_partition(&sections, NavConfig::default());
        navigator.show_section(1);

        let views = section_views(&sections, &navigator);

        assert!(views[0].html.starts_with("<h1>cragents</h1>\n\n<p>Constrained agents.</p>"));
        assert_eq!(views[0].class, Some("above"));
        assert_eq!(views[1].class, Some("active"));
        assert_eq!(views[2].class, None);
    }
}
