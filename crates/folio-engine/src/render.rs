//! Rendering seam between the component tree and a view layer.
//!
//! The tree walks itself and hands every node to a [`ContentBuilder`], which
//! decides what the output looks like. [`HtmlBuilder`] is the reference
//! implementation; [`format_outline`] is a plain-text dump used in tests and
//! by the CLI.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::components::{NodeId, NodeKind};
use crate::editing::Document;
use crate::error::Result;

pub type Attributes = BTreeMap<String, String>;

/// Builds an opaque representation of rendered components
pub trait ContentBuilder {
    type Output;

    /// An inline span
    fn build_text(
        &mut self,
        id: NodeId,
        content: &str,
        style: &Attributes,
        data: &Attributes,
    ) -> Self::Output;

    /// Any block or structure that is not a list, tagged by element name
    fn build_block(
        &mut self,
        id: NodeId,
        tag: &str,
        children: Vec<Self::Output>,
        style: &Attributes,
        data: &Attributes,
    ) -> Self::Output;

    /// A list; `tag` is `ol` or `ul`
    fn build_list(
        &mut self,
        id: NodeId,
        tag: &str,
        items: Vec<Self::Output>,
        style: &Attributes,
        data: &Attributes,
    ) -> Self::Output;

    /// Wrap one rendered list child
    fn build_list_item(&mut self, item: Self::Output) -> Self::Output;
}

impl Document {
    /// Render the subtree rooted at `id`
    pub fn render<B: ContentBuilder>(&self, id: NodeId, builder: &mut B) -> Result<B::Output> {
        let node = self.require(id)?;
        let decoration = node.decoration();
        let (style, data) = (decoration.style(), decoration.data());

        if let NodeKind::Character(text) = &node.kind {
            return Ok(builder.build_text(id, &text.to_string(), style, data));
        }

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            children.push(self.render(*child, builder)?);
        }

        let output = match &node.kind {
            NodeKind::List(list_type) => {
                let items = children
                    .into_iter()
                    .map(|item| builder.build_list_item(item))
                    .collect();
                builder.build_list(id, list_type.tag(), items, style, data)
            }
            kind => builder.build_block(id, element_tag(kind), children, style, data),
        };
        Ok(output)
    }
}

fn element_tag(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Article => "article",
        NodeKind::Paragraph => "p",
        NodeKind::Heading(heading) => heading.as_str(),
        NodeKind::List(list_type) => list_type.tag(),
        NodeKind::Table => "table",
        NodeKind::TableRow => "tr",
        NodeKind::TableCell(cell) => cell.as_str(),
        NodeKind::Character(_) => "span",
    }
}

/// Renders components as an HTML fragment
#[derive(Debug, Default)]
pub struct HtmlBuilder {
    /// Emit `data-id` attributes so a view can map elements back to nodes
    pub with_ids: bool,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { with_ids: true }
    }

    fn open_tag(&self, tag: &str, id: NodeId, style: &Attributes, data: &Attributes) -> String {
        let mut html = format!("<{tag}");
        if self.with_ids {
            let _ = write!(html, " data-id=\"{id}\"");
        }
        if !style.is_empty() {
            let css = style
                .iter()
                .map(|(key, value)| format!("{}:{}", kebab_case(key), value))
                .collect::<Vec<_>>()
                .join(";");
            let _ = write!(
                html,
                " style=\"{}\"",
                html_escape::encode_double_quoted_attribute(&css)
            );
        }
        for (key, value) in data {
            let _ = write!(
                html,
                " data-{}=\"{}\"",
                kebab_case(key),
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        html.push('>');
        html
    }
}

impl ContentBuilder for HtmlBuilder {
    type Output = String;

    fn build_text(
        &mut self,
        id: NodeId,
        content: &str,
        style: &Attributes,
        data: &Attributes,
    ) -> String {
        let escaped = html_escape::encode_text(content);
        if style.is_empty() && data.is_empty() && !self.with_ids {
            return escaped.into_owned();
        }
        format!("{}{escaped}</span>", self.open_tag("span", id, style, data))
    }

    fn build_block(
        &mut self,
        id: NodeId,
        tag: &str,
        children: Vec<String>,
        style: &Attributes,
        data: &Attributes,
    ) -> String {
        format!("{}{}</{tag}>", self.open_tag(tag, id, style, data), children.concat())
    }

    fn build_list(
        &mut self,
        id: NodeId,
        tag: &str,
        items: Vec<String>,
        style: &Attributes,
        data: &Attributes,
    ) -> String {
        self.build_block(id, tag, items, style, data)
    }

    fn build_list_item(&mut self, item: String) -> String {
        format!("<li>{item}</li>")
    }
}

/// `paddingLeft` -> `padding-left`
fn kebab_case(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            result.push('-');
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Indented plain-text outline of the live tree.
///
/// One line per component; text blocks show their text instead of their
/// spans, and non-empty style maps are appended in braces.
pub fn format_outline(doc: &Document) -> String {
    let mut out = String::new();
    outline_node(doc, doc.root(), 0, &mut out);
    out
}

fn outline_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    let _ = write!(out, "{}{}", "  ".repeat(depth), node.type_tag());
    if node.is_text_block() {
        let _ = write!(out, " {:?}", doc.text(id).unwrap_or_default());
    }
    let style = node.decoration().style();
    if !style.is_empty() {
        let pairs: Vec<String> = style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        let _ = write!(out, " {{{}}}", pairs.join(", "));
    }
    out.push('\n');
    if !node.is_text_block() {
        for child in node.children() {
            outline_node(doc, *child, depth + 1, out);
        }
    }
}
