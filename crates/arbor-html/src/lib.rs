/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! An HTML5 document graph with source positions.
//!
//! [`parse`] runs a conforming HTML5 tree builder over UTF-8 input and
//! returns a [`Document`]: an owned graph of elements, text, comments and
//! whitespace in which every node knows its parent, how the parser came to
//! insert it, and where it came from in the source.
//!
//! # Example
//!
//! ```rust
//! use arbor_html::{NodeKind, Tag, parse};
//!
//! let document = parse(r#"<div a="1" a="2">Hi</div>"#).unwrap();
//! let div = document.find_tag(Tag::Div).unwrap();
//!
//! // Duplicate attributes are kept; lookup returns the first.
//! assert_eq!(div.attributes().len(), 2);
//! assert_eq!(div.attribute("A").map(|a| a.value()), Some("1"));
//!
//! let text = div.node().first_child().unwrap();
//! assert_eq!(text.kind(), NodeKind::Text);
//! assert_eq!(text.parent(), Some(div.node()));
//! ```
//!
//! # Errors
//!
//! Input that is not UTF-8 is rejected before parsing with
//! [`Error::Encoding`]. A parser code outside the known vocabularies gives
//! [`Error::InvalidEnum`] and no partial document.

pub mod attribute;
mod builder;
mod dump;
pub mod error;
pub mod flags;
pub mod lifecycle;
pub mod node;
pub mod position;
pub mod tag;
pub mod vocab;

pub use arbor_native::Options;
pub use attribute::Attribute;
pub use error::{Error, Result};
pub use flags::{ParseFlag, ParseFlags};
pub use lifecycle::{HtmlParser, TreeParser, parse, parse_using, parse_with};
pub use node::{Descendants, Document, Element, ElementRef, Node, NodeData, NodeId, NodeRef, Text};
pub use position::SourcePosition;
pub use tag::{KNOWN_TAGS, Tag};
pub use vocab::{AttributeNamespace, Namespace, NodeKind, QuirksMode};
