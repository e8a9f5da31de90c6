/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The document graph.
//!
//! A [`Document`] owns every node in a flat arena. Nodes refer to each other
//! by [`NodeId`]; [`NodeRef`] pairs an id with its document for navigation.
//! Original-text fields borrow from the parsed input.

use std::fmt;
use std::ops::{Deref, Range};

use serde::Serialize;

use crate::attribute::Attribute;
use crate::error::{Error, Result};
use crate::flags::ParseFlags;
use crate::position::SourcePosition;
use crate::tag::Tag;
use crate::vocab::{Namespace, NodeKind, QuirksMode};

/// Index of a node within its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Doctype and compatibility information for a document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentInfo {
    pub(crate) has_doctype: bool,
    pub(crate) name: Option<String>,
    pub(crate) public_identifier: Option<String>,
    pub(crate) system_identifier: Option<String>,
    pub(crate) quirks_mode: QuirksMode,
}

/// A parsed document. Node [`NodeId::ROOT`] is the document node itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<'a> {
    info: DocumentInfo,
    nodes: Vec<Node<'a>>,
}

/// One node of the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<'a> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) index_within_parent: usize,
    pub(crate) parse_flags: ParseFlags,
    #[serde(flatten)]
    pub(crate) data: NodeData<'a>,
}

/// Variant payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData<'a> {
    Document,
    Element(Element<'a>),
    Text(Text<'a>),
    #[serde(rename = "cdata")]
    CData(Text<'a>),
    Comment(Text<'a>),
    Whitespace(Text<'a>),
}

impl NodeData<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::CData(_) => NodeKind::CData,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Whitespace(_) => NodeKind::Whitespace,
        }
    }
}

/// An element's own data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element<'a> {
    pub(crate) tag: Tag,
    pub(crate) namespace: Namespace,
    pub(crate) original_tag: &'a str,
    pub(crate) original_end_tag: &'a str,
    pub(crate) start_pos: SourcePosition,
    pub(crate) end_pos: SourcePosition,
    pub(crate) attributes: Vec<Attribute<'a>>,
}

impl<'a> Element<'a> {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The start tag as written. Empty for elements the parser inserted.
    pub fn original_tag(&self) -> &'a str {
        self.original_tag
    }

    /// The end tag as written. Empty when the element was closed implicitly.
    pub fn original_end_tag(&self) -> &'a str {
        self.original_end_tag
    }

    pub fn start_pos(&self) -> SourcePosition {
        self.start_pos
    }

    /// Where the end tag starts, or where the element's content ends when it
    /// had none. Equal to `start_pos` for void elements.
    pub fn end_pos(&self) -> SourcePosition {
        self.end_pos
    }

    /// All attributes in source order, duplicates included.
    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    /// The first attribute whose name matches `name`, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name().eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// The tag name as it appears in the source, taken from the start tag or
    /// failing that the end tag.
    pub fn original_tag_name(&self) -> Option<&'a str> {
        arbor_native::tag_name_in_original(self.original_tag)
            .or_else(|| arbor_native::tag_name_in_original(self.original_end_tag))
    }

    /// The canonical name for known tags, the source name otherwise.
    pub fn tag_name(&self) -> &'a str {
        self.tag
            .name()
            .or_else(|| self.original_tag_name())
            .unwrap_or_default()
    }

    /// Byte range covering the element's start tag through its end tag.
    /// Without an end tag only the start tag is covered. `None` for elements
    /// with no start tag in the source.
    pub fn offset_range(&self) -> Option<Range<usize>> {
        if self.original_tag.is_empty() {
            return None;
        }
        let start = self.start_pos.byte_offset();
        let end = if self.original_end_tag.is_empty() {
            start + self.original_tag.len()
        } else {
            self.end_pos.byte_offset() + self.original_end_tag.len()
        };
        Some(start..end)
    }

    /// Byte range between the start tag and the end tag. `None` unless both
    /// were written.
    pub fn content_range(&self) -> Option<Range<usize>> {
        if self.original_tag.is_empty() || self.original_end_tag.is_empty() {
            return None;
        }
        let start = self.start_pos.byte_offset() + self.original_tag.len();
        Some(start..self.end_pos.byte_offset())
    }
}

/// Text, CDATA, comment and whitespace data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text<'a> {
    pub(crate) text: String,
    pub(crate) original_text: &'a str,
    pub(crate) start_pos: SourcePosition,
}

impl<'a> Text<'a> {
    /// Decoded text. For comments, the comment body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source text, delimiters included.
    pub fn original_text(&self) -> &'a str {
        self.original_text
    }

    pub fn start_pos(&self) -> SourcePosition {
        self.start_pos
    }
}

impl<'a> Document<'a> {
    pub(crate) fn from_parts(info: DocumentInfo, nodes: Vec<Node<'a>>) -> Self {
        Document { info, nodes }
    }

    pub fn has_doctype(&self) -> bool {
        self.info.has_doctype
    }

    /// Doctype name, `None` without a doctype.
    pub fn doctype_name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    pub fn public_identifier(&self) -> Option<&str> {
        self.info.public_identifier.as_deref()
    }

    pub fn system_identifier(&self) -> Option<&str> {
        self.info.system_identifier.as_deref()
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        self.info.quirks_mode
    }

    /// Number of nodes, the document node included. Never zero.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeRef<'_, 'a> {
        NodeRef {
            document: self,
            id: NodeId::ROOT,
        }
    }

    /// The document element, normally `<html>`.
    pub fn html(&self) -> Option<ElementRef<'_, 'a>> {
        self.root().children().find_map(|child| child.as_element())
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, 'a>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { document: self, id })
    }

    /// The element with the given id. Fails with [`Error::Argument`] when
    /// `id` is out of range or names a node that is not an element.
    pub fn element(&self, id: NodeId) -> Result<ElementRef<'_, 'a>> {
        let node = self.node(id).ok_or_else(|| Error::Argument {
            message: format!("node {} does not exist", id.0),
        })?;
        node.as_element().ok_or_else(|| Error::Argument {
            message: format!("node {} is a {} node, not an element", id.0, node.kind()),
        })
    }

    /// Every node in document order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, 'a>> {
        self.root().descendants()
    }

    /// Elements with `tag`, in document order.
    pub fn elements_with_tag(&self, tag: Tag) -> impl Iterator<Item = ElementRef<'_, 'a>> {
        self.nodes()
            .filter_map(|node| node.as_element())
            .filter(move |element| element.tag() == tag)
    }

    pub fn find_tag(&self, tag: Tag) -> Option<ElementRef<'_, 'a>> {
        self.elements_with_tag(tag).next()
    }

    /// Text of the first `<title>` element.
    pub fn title(&self) -> Option<String> {
        self.find_tag(Tag::Title)
            .map(|title| title.node().text_content())
    }
}

/// A node together with the document it lives in.
#[derive(Clone, Copy)]
pub struct NodeRef<'d, 'a> {
    document: &'d Document<'a>,
    id: NodeId,
}

impl PartialEq for NodeRef<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

impl Eq for NodeRef<'_, '_> {}

impl fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

impl<'d, 'a> NodeRef<'d, 'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document<'a> {
        self.document
    }

    fn node(&self) -> &'d Node<'a> {
        &self.document.nodes[self.id.0]
    }

    fn at(&self, id: NodeId) -> NodeRef<'d, 'a> {
        NodeRef {
            document: self.document,
            id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.node().data.kind()
    }

    pub fn data(&self) -> &'d NodeData<'a> {
        &self.node().data
    }

    pub fn parse_flags(&self) -> ParseFlags {
        self.node().parse_flags
    }

    pub fn parent(&self) -> Option<NodeRef<'d, 'a>> {
        self.node().parent.map(|id| self.at(id))
    }

    /// Position among the parent's children, 0 for the document node.
    pub fn index_within_parent(&self) -> usize {
        self.node().index_within_parent
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'d, 'a>> {
        let document = self.document;
        self.node()
            .children
            .iter()
            .map(move |id| NodeRef { document, id: *id })
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn first_child(&self) -> Option<NodeRef<'d, 'a>> {
        self.children().next()
    }

    /// This node and everything below it, in document order.
    pub fn descendants(&self) -> Descendants<'d, 'a> {
        Descendants {
            document: self.document,
            stack: vec![self.id],
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data(), NodeData::Element(_))
    }

    pub fn as_element(&self) -> Option<ElementRef<'d, 'a>> {
        match self.data() {
            NodeData::Element(element) => Some(ElementRef {
                node: *self,
                element,
            }),
            _ => None,
        }
    }

    /// Text data for text, CDATA, comment and whitespace nodes.
    pub fn as_text(&self) -> Option<&'d Text<'a>> {
        match self.data() {
            NodeData::Text(text)
            | NodeData::CData(text)
            | NodeData::Comment(text)
            | NodeData::Whitespace(text) => Some(text),
            NodeData::Document | NodeData::Element(_) => None,
        }
    }

    /// Concatenated decoded character data below this node. Comments are
    /// skipped.
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        for node in self.descendants() {
            match node.data() {
                NodeData::Text(text) | NodeData::CData(text) | NodeData::Whitespace(text) => {
                    content.push_str(text.text())
                }
                _ => {}
            }
        }
        content
    }
}

/// A [`NodeRef`] known to be an element. Dereferences to [`Element`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'d, 'a> {
    node: NodeRef<'d, 'a>,
    element: &'d Element<'a>,
}

impl<'d, 'a> ElementRef<'d, 'a> {
    pub fn node(&self) -> NodeRef<'d, 'a> {
        self.node
    }

    pub fn element(&self) -> &'d Element<'a> {
        self.element
    }

    /// First child element with `tag`.
    pub fn child(&self, tag: Tag) -> Option<ElementRef<'d, 'a>> {
        self.node
            .children()
            .filter_map(|child| child.as_element())
            .find(|element| element.tag() == tag)
    }
}

impl<'a> Deref for ElementRef<'_, 'a> {
    type Target = Element<'a>;

    fn deref(&self) -> &Self::Target {
        self.element
    }
}

/// Preorder traversal. See [`NodeRef::descendants`].
pub struct Descendants<'d, 'a> {
    document: &'d Document<'a>,
    stack: Vec<NodeId>,
}

impl<'d, 'a> Iterator for Descendants<'d, 'a> {
    type Item = NodeRef<'d, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.document.node(id)?;
        self.stack.extend(node.node().children.iter().rev());
        Some(node)
    }
}
