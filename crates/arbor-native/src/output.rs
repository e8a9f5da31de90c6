//! Raw parser output.
//!
//! Nodes live in one vector and refer to each other by index. Every string
//! named `original_*` borrows from the parsed input; every other string is
//! owned by the output.

use crate::codes;

/// A (line, column, byte offset) triple. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSourcePosition {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

/// The result of one parse.
#[derive(Debug, Default)]
pub struct RawOutput<'a> {
    /// Index of the document node.
    pub document: usize,
    /// Index of the `html` element.
    pub root: usize,
    pub nodes: Vec<RawNode<'a>>,
    /// Parse errors reported during tree construction, in order.
    pub errors: Vec<String>,
}

impl<'a> RawOutput<'a> {
    pub fn node(&self, index: usize) -> Option<&RawNode<'a>> {
        self.nodes.get(index)
    }

    pub fn document_node(&self) -> Option<&RawNode<'a>> {
        self.node(self.document)
    }
}

#[derive(Debug, Clone)]
pub struct RawNode<'a> {
    /// One of the [`codes::node`] values.
    pub kind: u32,
    /// A union of [`codes::flags`] bits.
    pub parse_flags: u32,
    pub parent: Option<usize>,
    pub index_within_parent: usize,
    pub payload: RawPayload<'a>,
}

impl<'a> RawNode<'a> {
    /// Indices of this node's children, empty for text-like nodes.
    pub fn children(&self) -> &[usize] {
        match &self.payload {
            RawPayload::Document(document) => &document.children,
            RawPayload::Element(element) => &element.children,
            RawPayload::Text(_) => &[],
        }
    }
}

/// Variant data. `kind` selects which one is meaningful: document nodes
/// carry [`RawDocument`], element nodes [`RawElement`], and the four
/// text-like kinds [`RawText`].
#[derive(Debug, Clone)]
pub enum RawPayload<'a> {
    Document(RawDocument),
    Element(RawElement<'a>),
    Text(RawText<'a>),
}

#[derive(Debug, Clone)]
pub struct RawDocument {
    pub children: Vec<usize>,
    pub has_doctype: bool,
    /// Doctype fields, `None` when the document has no doctype.
    pub name: Option<String>,
    pub public_identifier: Option<String>,
    pub system_identifier: Option<String>,
    /// One of the [`codes::quirks`] values.
    pub quirks_mode: u32,
}

impl Default for RawDocument {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            has_doctype: false,
            name: None,
            public_identifier: None,
            system_identifier: None,
            quirks_mode: codes::quirks::NO_QUIRKS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawElement<'a> {
    pub children: Vec<usize>,
    /// Index into [`TAG_NAMES`](crate::TAG_NAMES), or
    /// [`TAG_UNKNOWN`](crate::TAG_UNKNOWN).
    pub tag: u32,
    /// One of the [`codes::namespace`] values.
    pub tag_namespace: u32,
    /// The start tag as written, empty for parser-inserted elements.
    pub original_tag: &'a str,
    /// The end tag as written, empty when the element was closed implicitly.
    pub original_end_tag: &'a str,
    pub start_pos: RawSourcePosition,
    pub end_pos: RawSourcePosition,
    pub attributes: Vec<RawAttribute<'a>>,
}

#[derive(Debug, Clone)]
pub struct RawAttribute<'a> {
    /// One of the [`codes::attr_namespace`] values.
    pub attr_namespace: u32,
    pub name: String,
    pub original_name: &'a str,
    pub value: String,
    /// The value as written, quotes included. Empty when the attribute has
    /// no value.
    pub original_value: &'a str,
    pub name_start: RawSourcePosition,
    pub name_end: RawSourcePosition,
    pub value_start: RawSourcePosition,
    pub value_end: RawSourcePosition,
}

/// Text, CDATA, comment and whitespace payload.
#[derive(Debug, Clone)]
pub struct RawText<'a> {
    pub text: String,
    pub original_text: &'a str,
    pub start_pos: RawSourcePosition,
}
