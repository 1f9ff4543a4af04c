//! Template engine for rendering sectioned pages.

use std::path::Path;

use minijinja::{context, path_loader, Environment};
use scrolldoc_nav::NavConfig;

/// Name of the built-in page layout.
pub const DEFAULT_LAYOUT: &str = "layout.html";

/// A sidebar navigation control.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SidebarEntry {
    /// Button label
    pub title: String,
    /// Section id
    pub id: String,
    /// Section index
    pub index: usize,
    /// Whether this is the active section
    pub active: bool,
}

/// A section container.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SectionView {
    /// Section id (the container gets `section-{id}`)
    pub id: String,
    /// Section index
    pub index: usize,
    /// Position class: `active`, `above`, or none
    pub class: Option<&'static str>,
    /// Rendered section content
    pub html: String,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Page description
    pub description: Option<String>,
    /// Sidebar heading
    pub heading: String,
    /// Sidebar controls
    pub sidebar: Vec<SidebarEntry>,
    /// Section containers
    pub sections: Vec<SectionView>,
    /// External repository link shown under the sidebar controls
    pub repository: Option<String>,
    /// Base URL
    pub base_url: String,
    /// Extra stylesheets to include
    pub styles: Vec<String>,
    /// Gesture thresholds read by the runtime script
    pub navigation: NavConfig,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned(DEFAULT_LAYOUT.to_string(), LAYOUT_TEMPLATE.to_string())
            .expect("Failed to add layout template");

        env.add_template_owned("sidebar.html".to_string(), SIDEBAR_TEMPLATE.to_string())
            .expect("Failed to add sidebar template");

        Self { env }
    }

    /// Create an engine that also loads layouts from `dir`.
    ///
    /// Built-in templates take precedence, so a custom layout can extend
    /// `base.html` or include `sidebar.html`.
    pub fn with_layouts(dir: &Path) -> Self {
        let mut engine = Self::new();
        engine.env.set_loader(path_loader(dir));
        engine
    }

    /// Whether a template with this name can be loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Pick the layout named in front matter, falling back to the built-in one.
    pub fn resolve_layout<'a>(&self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if self.has_template(name) => name,
            Some(name) => {
                tracing::warn!("Layout '{}' not found, using {}", name, DEFAULT_LAYOUT);
                DEFAULT_LAYOUT
            }
            None => DEFAULT_LAYOUT,
        }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            description => &context.description,
            heading => &context.heading,
            sidebar => &context.sidebar,
            sections => &context.sections,
            repository => &context.repository,
            base_url => &context.base_url,
            styles => &context.styles,
            navigation => &context.navigation,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}{% if title != site_title %} - {{ site_title }}{% endif %}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  {% block body %}{% endblock %}
  <script src="{{ base_url }}assets/main.js"></script>
</body>
</html>"##;

const LAYOUT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<aside class="sidebar">
  {% include "sidebar.html" %}
</aside>
<main data-scroll-threshold="{{ navigation.scroll_threshold }}" data-swipe-threshold="{{ navigation.swipe_threshold }}" data-settle-ms="{{ navigation.settle_ms }}" data-edge-tolerance="{{ navigation.edge_tolerance }}">
{% for section in sections %}
  <section id="section-{{ section.id }}" class="content-section{% if section.class %} {{ section.class }}{% endif %}" data-index="{{ section.index }}">
    <div class="section-inner">
      {{ section.html | safe }}
    </div>
  </section>
{% endfor %}
</main>
{% endblock %}"##;

const SIDEBAR_TEMPLATE: &str = r##"<div class="sidebar-title">{{ heading }}</div>
<nav class="sidebar-nav">
{% for entry in sidebar %}
  <button class="nav-btn{% if entry.active %} active{% endif %}" data-section="{{ entry.id }}" data-index="{{ entry.index }}">
    {{ entry.title }}
  </button>
{% endfor %}
{% if repository %}
  <a href="{{ repository }}" class="nav-btn repo-link" aria-label="Repository">
    <svg viewBox="0 0 24 24" width="16" height="16" fill="currentColor" aria-hidden="true">
      <path d="M12 0C5.37 0 0 5.37 0 12c0 5.31 3.435 9.795 8.205 11.385.6.105.825-.255.825-.57 0-.285-.015-1.23-.015-2.235-3.015.555-3.795-.735-4.035-1.41-.135-.345-.72-1.41-1.23-1.695-.42-.225-1.02-.78-.015-.795.945-.015 1.62.87 1.845 1.23 1.08 1.815 2.805 1.305 3.495.99.105-.78.42-1.305.765-1.605-2.67-.3-5.46-1.335-5.46-5.925 0-1.305.465-2.385 1.23-3.225-.12-.3-.54-1.53.12-3.18 0 0 1.005-.315 3.3 1.23.96-.27 1.98-.405 3-.405s2.04.135 3 .405c2.295-1.56 3.3-1.23 3.3-1.23.66 1.65.24 2.88.12 3.18.765.84 1.23 1.905 1.23 3.225 0 4.605-2.805 5.625-5.475 5.925.435.375.81 1.095.81 2.22 0 1.605-.015 2.895-.015 3.3 0 .315.225.69.825.57A12.02 12.02 0 0024 12c0-6.63-5.37-12-12-12z"/>
    </svg>
  </a>
{% endif %}
</nav>"##;
