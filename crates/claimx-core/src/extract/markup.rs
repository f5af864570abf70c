//! Well-formedness probe and element reader for embedded markup fragments.
//!
//! Fragments cut out of free text are parsed as standalone documents: one
//! root element, properly nested and closed tags, valid attributes and
//! entity references. Declarations, comments and processing instructions
//! are allowed around the root; text is not.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

/// Why a fragment was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MarkupError(String);

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

/// A parsed element with its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub nodes: Vec<MarkupNode>,
}

impl MarkupElement {
    fn new(name: String) -> Self {
        Self {
            name,
            nodes: Vec::new(),
        }
    }

    /// Child elements, skipping text.
    pub fn children(&self) -> impl Iterator<Item = &MarkupElement> {
        self.nodes.iter().filter_map(|node| match node {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&MarkupElement> {
        self.children().find(|child| child.name == name)
    }

    /// Decoded text of this element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                MarkupNode::Element(element) => element.collect_text(out),
                MarkupNode::Text(text) => out.push_str(text),
            }
        }
    }
}

/// Parse `markup` as a standalone document and return its root element.
pub fn parse_document(markup: &str) -> Result<MarkupElement, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut stack: Vec<MarkupElement> = Vec::new();
    let mut root: Option<MarkupElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| MarkupError(e.to_string()))?;

        match event {
            Event::Start(start) => {
                check_attributes(&start)?;
                stack.push(MarkupElement::new(element_name(start.name().as_ref())?));
            }
            Event::Empty(start) => {
                check_attributes(&start)?;
                let element = MarkupElement::new(element_name(start.name().as_ref())?);
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let name = element_name(end.name().as_ref())?;
                let element = stack
                    .pop()
                    .ok_or_else(|| MarkupError(format!("unexpected </{}>", name)))?;
                if element.name != name {
                    return Err(MarkupError(format!(
                        "expected </{}>, found </{}>",
                        element.name, name
                    )));
                }
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| MarkupError(e.to_string()))?;
                push_text(&text, &mut stack)?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata).map_err(|e| MarkupError(e.to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.nodes.push(MarkupNode::Text(text.to_string())),
                    None => return Err(MarkupError("CDATA outside the root element".into())),
                }
            }
            Event::Eof => break,
            // declaration, comment, processing instruction, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(MarkupError(format!("<{}> is never closed", open.name)));
    }

    root.ok_or_else(|| MarkupError("no root element".into()))
}

/// Whether `markup` is a well-formed standalone document.
pub fn is_well_formed(markup: &str) -> bool {
    match parse_document(markup) {
        Ok(_) => true,
        Err(e) => {
            debug!("Markup validation failed: {}", e);
            false
        }
    }
}

fn element_name(raw: &[u8]) -> Result<String, MarkupError> {
    let name = std::str::from_utf8(raw).map_err(|e| MarkupError(e.to_string()))?;
    if !is_xml_name(name) {
        return Err(MarkupError(format!("invalid element name {:?}", name)));
    }
    Ok(name.to_string())
}

// XML Name production, with non-ASCII characters accepted wholesale
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    let start_ok = first.is_ascii_alphabetic() || matches!(first, '_' | ':') || !first.is_ascii();
    start_ok
        && chars.all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.') || !c.is_ascii()
        })
}

fn check_attributes(start: &BytesStart<'_>) -> Result<(), MarkupError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError(e.to_string()))?;
        attr.unescape_value()
            .map_err(|e| MarkupError(e.to_string()))?;
    }
    Ok(())
}

fn attach(
    element: MarkupElement,
    stack: &mut [MarkupElement],
    root: &mut Option<MarkupElement>,
) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.nodes.push(MarkupNode::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(MarkupError(format!(
            "second root element <{}>",
            element.name
        ))),
    }
}

fn push_text(text: &str, stack: &mut [MarkupElement]) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(parent) => {
            if !text.is_empty() {
                parent.nodes.push(MarkupNode::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.chars().all(is_xml_whitespace) => Ok(()),
        None => Err(MarkupError("text outside the root element".into())),
    }
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
