//! Thin helpers over the `roxmltree` element tree.

use crate::geom::{Point, point};
use crate::{Error, Result};
use roxmltree::{Document, Node, ParsingOptions};

pub fn parse_document(text: &str) -> Result<Document<'_>> {
    // Editors occasionally emit a DOCTYPE; it carries nothing we need.
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, opts)?)
}

pub fn is_element_named(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

pub fn text_elements<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|n| is_element_named(*n, "text"))
}

pub fn path_elements<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|n| is_element_named(*n, "path"))
}

/// All `<path>` elements below `node`, in document order.
pub fn descendant_paths<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    node.descendants()
        .filter(|n| *n != node && is_element_named(*n, "path"))
        .collect()
}

/// Inkscape layers are groups carrying `inkscape:groupmode="layer"`.
pub fn is_layer(group: Node<'_, '_>) -> bool {
    group
        .attributes()
        .any(|a| a.name() == "groupmode" && a.value() == "layer")
}

fn first_tspan<'a, 'input>(text: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    text.children().find(|n| is_element_named(*n, "tspan"))
}

/// The string content of a `<text>` element: its first `<tspan>` if present, trimmed.
pub fn text_content(text: Node<'_, '_>) -> String {
    let source = first_tspan(text).unwrap_or(text);
    let raw: String = source
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.trim().to_string()
}

fn first_coordinate(node: Node<'_, '_>, name: &str) -> Result<Option<f64>> {
    let Some(raw) = node.attribute(name) else {
        return Ok(None);
    };
    let Some(first) = raw
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .find(|t| !t.is_empty())
    else {
        return Ok(None);
    };
    first
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::parse(format!("invalid {name} coordinate {raw:?}")))
}

/// Pixel position of a `<text>` element, taken from its first `<tspan>` when available.
pub fn text_position(text: Node<'_, '_>) -> Result<Option<Point>> {
    for source in first_tspan(text).into_iter().chain(std::iter::once(text)) {
        let x = first_coordinate(source, "x")?;
        let y = first_coordinate(source, "y")?;
        if let (Some(x), Some(y)) = (x, y) {
            return Ok(Some(point(x, y)));
        }
    }
    Ok(None)
}
