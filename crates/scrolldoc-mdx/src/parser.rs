//! Markdown document parser.

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag};
use scrolldoc_nav::{DocumentNode, NodeKind};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed markdown page.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Top-level blocks in document order
    pub blocks: Vec<Block>,
}

/// A rendered top-level block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Structural role (title, subheading, other)
    pub kind: NodeKind,

    /// Concatenated text content
    pub text: String,

    /// Rendered HTML
    pub html: String,
}

impl DocumentNode for Block {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for every page.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a markdown page into front matter and top-level blocks.
pub fn parse_markdown(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;
    let blocks = split_blocks(content);

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        blocks,
    })
}

/// Render markdown and split the output at top-level block boundaries.
///
/// Blocks are rendered one at a time, so footnote markers and definition
/// labels are numbered here, in document order, rather than by the HTML
/// writer.
pub fn split_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Event> = Vec::new();
    let mut kind = NodeKind::Content;
    let mut text = String::new();
    let mut depth = 0usize;
    let mut footnotes: HashMap<CowStr, usize> = HashMap::new();

    for event in Parser::new_ext(content, options()) {
        match &event {
            Event::Start(tag) => {
                if depth == 0 {
                    kind = classify(tag);
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            _ => {}
        }

        pending.push(number_footnotes(event, &mut footnotes));

        // Rules and other leaf events at depth 0 are blocks on their own
        if depth == 0 {
            blocks.push(finish(kind, &mut text, &mut pending));
            kind = NodeKind::Content;
        }
    }

    if !pending.is_empty() {
        blocks.push(finish(kind, &mut text, &mut pending));
    }

    blocks
}

fn classify(tag: &Tag) -> NodeKind {
    match tag {
        Tag::Heading {
            level: HeadingLevel::H1,
            ..
        } => NodeKind::Title,
        Tag::Heading {
            level: HeadingLevel::H2,
            ..
        } => NodeKind::Subheading,
        _ => NodeKind::Content,
    }
}

fn number_footnotes<'a>(event: Event<'a>, numbers: &mut HashMap<CowStr<'a>, usize>) -> Event<'a> {
    match event {
        Event::FootnoteReference(name) => {
            let number = footnote_number(numbers, &name);
            Event::InlineHtml(
                format!(
                    r##"<sup class="footnote-reference"><a href="#{}">{}</a></sup>"##,
                    escape_attr(&name),
                    number
                )
                .into(),
            )
        }
        Event::Start(Tag::FootnoteDefinition(name)) => {
            let number = footnote_number(numbers, &name);
            Event::Html(
                format!(
                    r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{}</sup>"#,
                    escape_attr(&name),
                    number
                )
                .into(),
            )
        }
        other => other,
    }
}

fn footnote_number<'a>(numbers: &mut HashMap<CowStr<'a>, usize>, name: &CowStr<'a>) -> usize {
    let next = numbers.len() + 1;
    *numbers.entry(name.clone()).or_insert(next)
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn finish(kind: NodeKind, text: &mut String, pending: &mut Vec<Event>) -> Block {
    let mut html_output = String::new();
    html::push_html(&mut html_output, pending.drain(..));

    Block {
        kind,
        text: std::mem::take(text),
        html: html_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: cragents
layout: layout.html
---

# cragents

Constrained agents.

## Installation

```bash
pip install cragents
```

- one
- two

## Usage

Run it.
"#;

        let doc = parse_markdown(source).unwrap();

        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.title, "cragents");

        let kinds: Vec<_> = doc.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Title,
                NodeKind::Content,
                NodeKind::Subheading,
                NodeKind::Content,
                NodeKind::Content,
                NodeKind::Subheading,
                NodeKind::Content,
            ]
        );
        assert_eq!(doc.blocks[0].html, "<h1>cragents</h1>\n");
        assert_eq!(doc.blocks[2].text, "Installation");
        assert!(doc.blocks[3].html.contains("language-bash"));
        assert!(doc.blocks[4].html.starts_with("<ul>"));
        assert!(doc.blocks[4].html.contains("<li>two</li>"));
    }

    #[test]
    fn nested_headings_stay_content() {
        let blocks = split_blocks("## Top\n\n### Nested\n\n> # Quoted\n");

        let kinds: Vec<_> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Subheading, NodeKind::Content, NodeKind::Content]
        );
        assert!(blocks[2].html.starts_with("<blockquote>"));
    }

    #[test]
    fn rules_are_standalone_blocks() {
        let blocks = split_blocks("before\n\n---\n\nafter\n");

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].html, "<hr />\n");
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let blocks = split_blocks("## The `agent` API\n");

        assert_eq!(blocks[0].text, "The agent API");
        assert_eq!(blocks[0].kind(), NodeKind::Subheading);
    }

    #[test]
    fn footnotes_numbered_across_blocks() {
        let source = "First[^a].\n\nSecond[^b], again[^a].\n\n[^a]: alpha\n\n[^b]: beta\n";

        let joined: String = split_blocks(source)
            .iter()
            .map(|b| b.html.as_str())
            .collect();

        let mut whole = String::new();
        html::push_html(&mut whole, Parser::new_ext(source, options()));

        assert_eq!(joined, whole);
        assert!(joined.contains(r##"<a href="#b">2</a>"##));
        assert!(joined.contains(r#"id="b"><sup class="footnote-definition-label">2</sup>"#));
    }

    #[test]
    fn parses_without_frontmatter() {
        let doc = parse_markdown("# Just Markdown\n\nNo frontmatter.").unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.blocks.len(), 2);
    }
}
