//! HTML snapshot loading.
//!
//! Parses a saved page with `scraper` and rebuilds it as a [`MemoryDocument`].
//! A snapshot carries no layout engine, so geometry and computed style come
//! from each element's inline `style`: `display`, `grid-template-columns`,
//! and `left` / `top` / `width` / `height` in pixels.

use std::path::Path;

use scraper::{Html, Node};

use super::{BoundingBox, ComputedStyle, MemoryDocument};
use crate::result::ProbeResult;

/// Parse an HTML string
pub fn parse_html(markup: &str) -> ProbeResult<MemoryDocument> {
    let html = Html::parse_document(markup);
    let mut doc = MemoryDocument::empty();

    let mut stack = vec![(html.tree.root(), doc.root())];
    while let Some((source, parent)) = stack.pop() {
        for child in source.children() {
            let created = match child.value() {
                Node::Element(element) => {
                    let id = doc.append_element(parent, element.name())?;
                    for (name, value) in element.attrs() {
                        doc.set_attribute(id, name, value)?;
                    }
                    if let Some(style) = element.attr("style") {
                        let inline = InlineStyle::parse(style);
                        doc.set_style(id, inline.computed())?;
                        doc.set_bounding_box(id, inline.rect())?;
                    }
                    Some(id)
                }
                Node::Text(text) => {
                    doc.append_text(parent, text)?;
                    None
                }
                _ => None,
            };
            if let Some(id) = created {
                stack.push((child, id));
            }
        }
    }
    Ok(doc)
}

/// Read and parse an HTML file
pub fn load_html(path: &Path) -> ProbeResult<MemoryDocument> {
    let markup = std::fs::read_to_string(path)?;
    parse_html(&markup)
}

#[derive(Debug, Default)]
struct InlineStyle {
    display: Option<String>,
    grid_template_columns: Option<String>,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl InlineStyle {
    fn parse(style: &str) -> Self {
        let mut inline = Self::default();
        for declaration in style.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "display" => inline.display = Some(value.to_ascii_lowercase()),
                "grid-template-columns" => inline.grid_template_columns = Some(value.to_string()),
                "left" => inline.left = pixels(value),
                "top" => inline.top = pixels(value),
                "width" => inline.width = pixels(value),
                "height" => inline.height = pixels(value),
                _ => {}
            }
        }
        inline
    }

    fn computed(&self) -> ComputedStyle {
        let defaults = ComputedStyle::default();
        ComputedStyle {
            display: self.display.clone().unwrap_or(defaults.display),
            grid_template_columns: self
                .grid_template_columns
                .clone()
                .unwrap_or(defaults.grid_template_columns),
        }
    }

    fn rect(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }
}

fn pixels(value: &str) -> f32 {
    value.trim_end_matches("px").trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_parse_builds_tree() {
        let doc = parse_html(
            r#"<html><body><div id="chatbox"><a href="/p/1">View Product</a></div></body></html>"#,
        )
        .unwrap();
        let chatbox = doc.element_by_id("chatbox").unwrap();
        let anchors = doc.descendants_by_tag(chatbox, "a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(doc.text_content(anchors[0]), "View Product");
        assert_eq!(doc.parent(chatbox), Some(doc.body()));
    }

    #[test]
    fn test_siblings_keep_document_order() {
        let doc = parse_html(r#"<body><p id="a">one</p><p id="b">two</p><p id="c">three</p></body>"#)
            .unwrap();
        let order: Vec<_> = doc.descendants_by_tag(doc.body(), "p");
        let expected: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| doc.element_by_id(id).unwrap())
            .collect();
        assert_eq!(order, expected);
        assert_eq!(doc.text_content(doc.body()), "onetwothree");
    }

    #[test]
    fn test_whitespace_text_is_kept() {
        let doc = parse_html("<body><div id=\"c\">\n  <b>Widget</b>\n  <span>$5</span>\n</div></body>")
            .unwrap();
        let card = doc.element_by_id("c").unwrap();
        assert_eq!(doc.text_content(card), "\n  Widget\n  $5\n");
    }

    #[test]
    fn test_inline_style_geometry() {
        let doc = parse_html(
            r#"<body><ul id="list" style="display: grid; grid-template-columns: 1fr 1fr"><li id="x" style="left: 24.5px; width: 100px"></li></ul></body>"#,
        )
        .unwrap();
        let list = doc.element_by_id("list").unwrap();
        let style = doc.computed_style(list);
        assert!(style.is_grid());
        assert_eq!(style.grid_template_columns, "1fr 1fr");
        let item = doc.element_by_id("x").unwrap();
        assert_eq!(doc.bounding_box(item), BoundingBox::new(24.5, 0.0, 100.0, 0.0));
    }

    #[test]
    fn test_unstyled_defaults() {
        let doc = parse_html("<body><div id=\"d\"></div></body>").unwrap();
        let div = doc.element_by_id("d").unwrap();
        assert_eq!(doc.computed_style(div), ComputedStyle::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_html(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(err.to_string().contains("I/O"));
    }
}
