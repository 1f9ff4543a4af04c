//! Partitioning of a rendered document into navigable sections.
//!
//! A document is treated as a flat, ordered list of top-level block nodes.
//! The first top-level title is captured for the sidebar heading, every
//! top-level subheading opens a new section, and whatever precedes the first
//! subheading lands in a synthetic intro section.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Id of the synthetic section holding the title and pre-heading content.
pub const INTRO_ID: &str = "intro";

/// Sidebar label of the synthetic intro section.
pub const INTRO_TITLE: &str = "Intro";

/// Structural role of a top-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Top-level page title (an `h1`)
    Title,
    /// Section-opening subheading (an `h2`)
    Subheading,
    /// Anything else
    Content,
}

/// A top-level block of a rendered document.
pub trait DocumentNode {
    /// Role of this node in the document structure.
    fn kind(&self) -> NodeKind;

    /// Plain text content, used for section titles and ids.
    fn text(&self) -> &str;
}

impl<T: DocumentNode + ?Sized> DocumentNode for &T {
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    fn text(&self) -> &str {
        (**self).text()
    }
}

/// A navigable unit of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<N> {
    /// Slug derived from the heading text
    pub id: String,

    /// Heading text
    pub title: String,

    /// Nodes belonging to this section, in document order
    pub content: Vec<N>,
}

impl<N> Section<N> {
    /// Whether this is the synthetic intro section.
    pub fn is_intro(&self) -> bool {
        self.id == INTRO_ID
    }
}

/// Result of partitioning a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition<N> {
    /// First top-level title node, excluded from section bodies
    pub title: Option<N>,

    /// Sections in document order
    pub sections: Vec<Section<N>>,
}

impl<N: DocumentNode> Partition<N> {
    /// Trimmed text of the captured title, if any.
    pub fn heading(&self) -> Option<&str> {
        self.title.as_ref().map(|node| node.text().trim())
    }
}

impl<N> Partition<N> {
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document produced no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section ids in order.
    pub fn ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    /// Index of the first section with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Total number of nodes across all section bodies.
    pub fn content_len(&self) -> usize {
        self.sections.iter().map(|s| s.content.len()).sum()
    }
}

/// Split an ordered list of top-level nodes into sections.
///
/// Only the first title is captured; any later title is ordinary content of
/// whichever section is open at that point. The intro section is emitted only
/// when there is a title or some content before the first subheading.
pub fn partition<N, I>(nodes: I) -> Partition<N>
where
    N: DocumentNode,
    I: IntoIterator<Item = N>,
{
    let mut title: Option<N> = None;
    let mut intro = Vec::new();
    let mut sections = Vec::new();
    let mut current: Option<Section<N>> = None;

    for node in nodes {
        match node.kind() {
            NodeKind::Title if title.is_none() => {
                title = Some(node);
            }
            NodeKind::Subheading => {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                let heading = node.text().to_string();
                current = Some(Section {
                    id: slugify(&heading),
                    title: heading,
                    content: vec![node],
                });
            }
            _ => match current.as_mut() {
                Some(section) => section.content.push(node),
                None => intro.push(node),
            },
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }

    if !intro.is_empty() || title.is_some() {
        sections.insert(
            0,
            Section {
                id: INTRO_ID.to_string(),
                title: INTRO_TITLE.to_string(),
                content: intro,
            },
        );
    }

    Partition { title, sections }
}

/// Convert heading text to a section id.
///
/// Lowercases, then collapses every run of characters outside `[a-z0-9]`
/// into a single `-`. Leading and trailing separators are kept.
pub fn slugify(text: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));
    re.replace_all(&text.to_lowercase(), "-").into_owned()
}
