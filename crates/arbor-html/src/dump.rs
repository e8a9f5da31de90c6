/*
 * dump.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Text renderings of a document: source re-serialization and an outline
//! of the element tree.

use std::fmt::{self, Write};

use crate::node::{Document, Element, NodeData, NodeRef};

enum Step<'d, 'a> {
    Open(NodeRef<'d, 'a>),
    Close(&'d Element<'a>),
}

/// Writes the subtree back out using the original source text where there
/// is any. Elements without a written start tag get a synthesized
/// `<name>` and `</name>`; a written start tag is reproduced with whatever
/// end tag was written, if any.
impl fmt::Display for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps = vec![Step::Open(*self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(node) => match node.data() {
                    NodeData::Document => {
                        steps.extend(node.children().rev().map(Step::Open));
                    }
                    NodeData::Element(element) => {
                        if element.original_tag().is_empty() {
                            write!(f, "<{}>", element.tag_name())?;
                        } else {
                            f.write_str(element.original_tag())?;
                        }
                        steps.push(Step::Close(element));
                        steps.extend(node.children().rev().map(Step::Open));
                    }
                    NodeData::Text(text)
                    | NodeData::CData(text)
                    | NodeData::Comment(text)
                    | NodeData::Whitespace(text) => f.write_str(text.original_text())?,
                },
                Step::Close(element) => {
                    if element.original_tag().is_empty() {
                        write!(f, "</{}>", element.tag_name())?;
                    } else {
                        f.write_str(element.original_end_tag())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

impl NodeRef<'_, '_> {
    /// An indented outline of the elements below this node, one per line:
    /// the uppercased tag name followed by the attribute names.
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_tree(&mut out);
        out
    }

    pub fn write_tree<W: Write>(&self, out: &mut W) -> fmt::Result {
        let mut pending = vec![(*self, 0usize)];
        while let Some((node, indent)) = pending.pop() {
            let child_indent = match node.data() {
                NodeData::Document => indent,
                NodeData::Element(element) => {
                    write!(out, "{:indent$}<{}", "", element.tag_name().to_uppercase())?;
                    for attribute in element.attributes() {
                        write!(out, " {}", attribute.name())?;
                    }
                    out.write_str(">\n")?;
                    indent + 2
                }
                _ => continue,
            };
            pending.extend(node.children().rev().map(|child| (child, child_indent)));
        }
        Ok(())
    }
}

impl Document<'_> {
    pub fn dump_tree(&self) -> String {
        self.root().dump_tree()
    }
}
