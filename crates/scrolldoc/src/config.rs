//! Configuration file (docs.toml) loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scrolldoc_mdx::PageHeader;
use scrolldoc_nav::NavConfig;
use scrolldoc_static::BuildConfig;
use serde::Deserialize;

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    /// Present only when the index page is generated from a README
    #[serde(default)]
    pub readme: Option<ReadmeConfig>,
    #[serde(default)]
    pub navigation: NavConfig,
    #[serde(default)]
    pub build: BuildSettings,

    /// Directory the config was loaded from; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_src")]
    pub src: String,
    #[serde(default = "default_dest")]
    pub dest: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Public URL of the deployed site
    pub location: Option<String>,
    /// Repository linked from the sidebar
    pub repository: Option<String>,
    /// Layout directory, relative to `src`
    pub layouts: Option<String>,
    /// Paths under `src` copied into the output
    #[serde(default)]
    pub copy: Vec<String>,
    /// Stylesheets linked from every page
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeConfig {
    #[serde(default = "default_readme_input")]
    pub input: String,
    /// Generated page, relative to `src`
    #[serde(default = "default_readme_output")]
    pub output: String,
    /// Page title; the site title when unset
    pub title: Option<String>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            src: default_src(),
            dest: default_dest(),
            title: default_title(),
            base_url: default_base_url(),
            location: None,
            repository: None,
            layouts: None,
            copy: vec![],
            styles: vec![],
        }
    }
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            input: default_readme_input(),
            output: default_readme_output(),
            title: None,
            layout: default_layout(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_src() -> String {
    ".".to_string()
}
fn default_dest() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_readme_input() -> String {
    "README.md".to_string()
}
fn default_readme_output() -> String {
    "index.md".to_string()
}
fn default_layout() -> String {
    "layout.html".to_string()
}
fn default_minify() -> bool {
    true
}

impl ConfigFile {
    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn src_dir(&self) -> PathBuf {
        self.resolve(&self.site.src)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.site.dest)
    }

    /// README settings, falling back to defaults when the table is absent.
    pub fn readme_or_default(&self) -> ReadmeConfig {
        self.readme.clone().unwrap_or_default()
    }

    /// Front matter written in front of the README.
    pub fn page_header(&self, readme: &ReadmeConfig) -> PageHeader {
        PageHeader {
            title: readme
                .title
                .clone()
                .unwrap_or_else(|| self.site.title.clone()),
            layout: readme.layout.clone(),
        }
    }

    /// Build settings, with command-line overrides applied.
    pub fn build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        let src_dir = self.src_dir();

        BuildConfig {
            layouts_dir: self.site.layouts.as_ref().map(|dir| src_dir.join(dir)),
            src_dir,
            output_dir: output.unwrap_or_else(|| self.output_dir()),
            copy: self.site.copy.clone(),
            styles: self.site.styles.clone(),
            minify: minify.unwrap_or(self.build.minify),
            base_url: self.site.base_url.clone(),
            location: self.site.location.clone(),
            repository: self.site.repository.clone(),
            title: self.site.title.clone(),
            navigation: self.navigation,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !path.exists() {
        return Ok(ConfigFile {
            base_dir,
            ..Default::default()
        });
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.base_dir = base_dir;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
