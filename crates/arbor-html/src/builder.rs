/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion of raw parser output into a [`Document`].
//!
//! The raw tree is walked with an explicit worklist so deeply nested input
//! cannot exhaust the stack. Every code is mapped before anything is
//! returned; a single bad code fails the whole conversion.

use arbor_native::{RawDocument, RawElement, RawNode, RawOutput, RawPayload, RawText};
use tracing::trace;

use crate::attribute::Attribute;
use crate::error::{Error, Result};
use crate::flags::ParseFlags;
use crate::node::{Document, DocumentInfo, Element, Node, NodeData, NodeId, Text};
use crate::position::SourcePosition;
use crate::tag::Tag;
use crate::vocab::{Namespace, NodeKind, QuirksMode};

pub(crate) fn build_document<'a>(output: &RawOutput<'a>) -> Result<Document<'a>> {
    let root = output.node(output.document).ok_or_else(|| Error::Parse {
        reason: format!("document node {} is missing", output.document),
    })?;
    let RawPayload::Document(raw_document) = &root.payload else {
        return Err(Error::Parse {
            reason: "parser output is not rooted at a document node".to_string(),
        });
    };
    let info = build_info(raw_document)?;

    let mut nodes: Vec<Node<'a>> = Vec::with_capacity(output.nodes.len());
    let mut visited = vec![false; output.nodes.len()];
    let mut pending: Vec<(usize, Option<NodeId>)> = vec![(output.document, None)];

    while let Some((index, parent)) = pending.pop() {
        let raw = output.node(index).ok_or_else(|| Error::Parse {
            reason: format!("node {index} is referenced but missing"),
        })?;
        if std::mem::replace(&mut visited[index], true) {
            return Err(Error::Parse {
                reason: format!("node {index} is reachable twice"),
            });
        }

        let id = NodeId::new(nodes.len());
        let mut node = build_node(raw)?;
        node.parent = parent;
        if let Some(parent) = parent {
            let siblings = &mut nodes[parent.index()].children;
            node.index_within_parent = siblings.len();
            siblings.push(id);
        }
        nodes.push(node);

        for child in raw.children().iter().rev() {
            pending.push((*child, Some(id)));
        }
    }

    if nodes.first().map(|node| node.data.kind()) != Some(NodeKind::Document) {
        return Err(Error::Parse {
            reason: "parser output is not rooted at a document node".to_string(),
        });
    }
    trace!(nodes = nodes.len(), "built document graph");
    Ok(Document::from_parts(info, nodes))
}

fn build_info(raw: &RawDocument) -> Result<DocumentInfo> {
    Ok(DocumentInfo {
        has_doctype: raw.has_doctype,
        name: raw.name.clone(),
        public_identifier: raw.public_identifier.clone(),
        system_identifier: raw.system_identifier.clone(),
        quirks_mode: QuirksMode::from_code(raw.quirks_mode)?,
    })
}

fn build_node<'a>(raw: &RawNode<'a>) -> Result<Node<'a>> {
    let kind = NodeKind::from_code(raw.kind)?;
    let data = match (kind, &raw.payload) {
        (NodeKind::Document, RawPayload::Document(_)) => NodeData::Document,
        (NodeKind::Element, RawPayload::Element(element)) => {
            NodeData::Element(build_element(element)?)
        }
        (NodeKind::Text, RawPayload::Text(text)) => NodeData::Text(build_text(text)),
        (NodeKind::CData, RawPayload::Text(text)) => NodeData::CData(build_text(text)),
        (NodeKind::Comment, RawPayload::Text(text)) => NodeData::Comment(build_text(text)),
        (NodeKind::Whitespace, RawPayload::Text(text)) => {
            NodeData::Whitespace(build_text(text))
        }
        (kind, _) => {
            return Err(Error::Parse {
                reason: format!("{kind} node carries a mismatched payload"),
            });
        }
    };
    Ok(Node {
        parent: None,
        children: Vec::new(),
        index_within_parent: 0,
        parse_flags: ParseFlags::from_bits(raw.parse_flags),
        data,
    })
}

fn build_element<'a>(raw: &RawElement<'a>) -> Result<Element<'a>> {
    let attributes = raw
        .attributes
        .iter()
        .map(Attribute::from_raw)
        .collect::<Result<Vec<_>>>()?;
    Ok(Element {
        tag: Tag::from_code(raw.tag),
        namespace: Namespace::from_code(raw.tag_namespace)?,
        original_tag: raw.original_tag,
        original_end_tag: raw.original_end_tag,
        start_pos: SourcePosition::from(&raw.start_pos),
        end_pos: SourcePosition::from(&raw.end_pos),
        attributes,
    })
}

fn build_text<'a>(raw: &RawText<'a>) -> Text<'a> {
    Text {
        text: raw.text.clone(),
        original_text: raw.original_text,
        start_pos: SourcePosition::from(&raw.start_pos),
    }
}
