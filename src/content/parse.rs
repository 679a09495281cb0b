// Markup tree access: only the top level of a fragment is ever needed
use super::escape::{escape_attr, escape_text};
use scraper::{ElementRef, Html, Node};

/// One top-level node of a parsed markup fragment, already serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        name: String,
        /// Opening tag including attributes, e.g. `<a href="x">`.
        open_tag: String,
        /// Full serialized element.
        outer: String,
        /// Concatenated descendant text, unescaped.
        inner_text: String,
    },
    /// Text run; `raw` is the decoded text, `escaped` its serialization.
    Text { raw: String, escaped: String },
    /// Anything else (comments), serialized.
    Other(String),
}

impl MarkupNode {
    pub fn serialized(&self) -> &str {
        match self {
            MarkupNode::Element { outer, .. } => outer,
            MarkupNode::Text { escaped, .. } => escaped,
            MarkupNode::Other(s) => s,
        }
    }
}

/// Parses a markup fragment into its top-level nodes in document order.
pub trait MarkupParser: Send + Sync {
    fn top_level_nodes(&self, markup: &str) -> Vec<MarkupNode>;
}

/// HTML fragment parser backed by `scraper` (html5ever).
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MarkupParser for HtmlParser {
    fn top_level_nodes(&self, markup: &str) -> Vec<MarkupNode> {
        let fragment = Html::parse_fragment(markup);
        let root = fragment.root_element();
        root.children()
            .filter_map(|child| match child.value() {
                Node::Element(element) => {
                    let element_ref = ElementRef::wrap(child)?;
                    let mut open_tag = format!("<{}", element.name());
                    for (key, value) in element.attrs() {
                        open_tag.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
                    }
                    open_tag.push('>');
                    Some(MarkupNode::Element {
                        name: element.name().to_string(),
                        open_tag,
                        outer: element_ref.html(),
                        inner_text: element_ref.text().collect(),
                    })
                }
                Node::Text(text) => Some(MarkupNode::Text {
                    raw: String::from(&**text),
                    escaped: escape_text(text).into_owned(),
                }),
                Node::Comment(comment) => Some(MarkupNode::Other(format!("<!--{}-->", &**comment))),
                _ => None,
            })
            .collect()
    }
}
