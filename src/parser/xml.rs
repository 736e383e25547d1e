//! Minimal element tree over `quick-xml` events.
//!
//! PubMed records are navigated by element name at arbitrary depth, and the
//! email fallback needs to visit every text-bearing element, so the document is
//! materialized into a small owned tree instead of being deserialized into
//! fixed structs. Text follows the usual element-tree model: `text` is the
//! content before the first child, `tail` is the content after the element's
//! end tag and before its next sibling.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Deepest element nesting accepted. Tree walks and drops recurse per level,
/// so anything deeper is rejected up front. PubMed records nest about ten deep.
pub const MAX_DEPTH: usize = 256;

/// Errors that make a whole document unusable
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error at position {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unclosed element <{0}> at end of document")]
    Unclosed(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// One element of a parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    text: String,
    tail: String,
    children: Vec<XmlNode>,
    defect: Option<String>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Parse a complete document. The returned node is a synthetic
    /// `#document` root whose children are the top-level elements.
    ///
    /// Text that fails to unescape (for example an unknown entity) does not
    /// fail the document; it is recorded as a defect on the enclosing element
    /// so callers can reject just that part of the tree.
    pub fn parse_document(xml: &str) -> Result<XmlNode, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut stack = vec![XmlNode::new("#document".to_string())];

        loop {
            let event = reader.read_event().map_err(|source| XmlError::Syntax {
                position: reader.buffer_position() as u64,
                source,
            })?;

            match event {
                Event::Start(e) => {
                    // The synthetic root occupies the bottom of the stack
                    if stack.len() > MAX_DEPTH {
                        return Err(XmlError::TooDeep(MAX_DEPTH));
                    }
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stack.push(XmlNode::new(name));
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::new(name));
                    }
                }
                Event::End(_) => {
                    // quick-xml rejects mismatched end tags, so the top of the
                    // stack is always the element being closed
                    if stack.len() > 1 {
                        if let Some(node) = stack.pop() {
                            if let Some(parent) = stack.last_mut() {
                                parent.children.push(node);
                            }
                        }
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        match e.unescape() {
                            Ok(text) => current.append_text(&text),
                            Err(err) => {
                                if current.defect.is_none() {
                                    current.defect = Some(err.to_string());
                                }
                            }
                        }
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.append_text(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() > 1 {
            let name = stack.last().map(|n| n.name.clone()).unwrap_or_default();
            return Err(XmlError::Unclosed(name));
        }

        Ok(stack.pop().unwrap_or_default())
    }

    fn append_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(text),
            None => self.text.push_str(text),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text before the first child; `None` when empty
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// All text inside this element, children included, in document order
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Trimmed text of the first direct child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlNode::text)
    }

    /// All descendants (not including `self`) in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given name, at any depth
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.descendants().find(|node| node.name == name)
    }

    /// Every descendant with the given name, at any depth
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.descendants().filter(move |node| node.name == name)
    }

    /// First text decoding defect in this element or below
    pub fn first_defect(&self) -> Option<&str> {
        self.defect
            .as_deref()
            .or_else(|| self.descendants().find_map(|node| node.defect.as_deref()))
    }
}

/// Pre-order iterator over the descendants of an [`XmlNode`]
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
