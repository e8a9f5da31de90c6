/*
 * vocab.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Symbolic vocabularies for the parser's numeric codes.
//!
//! Each enumeration maps a closed range of codes. A code outside that range
//! means the parser and this crate disagree about the vocabulary, and is
//! reported as [`Error::InvalidEnum`].

use std::fmt;

use arbor_native::codes;
use serde::Serialize;

use crate::error::{Error, Result};

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Element,
    Text,
    #[serde(rename = "cdata")]
    CData,
    Comment,
    Whitespace,
}

impl NodeKind {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            codes::node::DOCUMENT => Ok(NodeKind::Document),
            codes::node::ELEMENT => Ok(NodeKind::Element),
            codes::node::TEXT => Ok(NodeKind::Text),
            codes::node::CDATA => Ok(NodeKind::CData),
            codes::node::COMMENT => Ok(NodeKind::Comment),
            codes::node::WHITESPACE => Ok(NodeKind::Whitespace),
            _ => Err(Error::invalid_enum("node kind", code)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::CData => "cdata",
            NodeKind::Comment => "comment",
            NodeKind::Whitespace => "whitespace",
        }
    }
}

/// Document compatibility mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuirksMode {
    #[default]
    NoQuirks,
    Quirks,
    LimitedQuirks,
}

impl QuirksMode {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            codes::quirks::NO_QUIRKS => Ok(QuirksMode::NoQuirks),
            codes::quirks::QUIRKS => Ok(QuirksMode::Quirks),
            codes::quirks::LIMITED_QUIRKS => Ok(QuirksMode::LimitedQuirks),
            _ => Err(Error::invalid_enum("quirks mode", code)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuirksMode::NoQuirks => "no_quirks",
            QuirksMode::Quirks => "quirks",
            QuirksMode::LimitedQuirks => "limited_quirks",
        }
    }
}

/// Element namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    #[serde(rename = "mathml")]
    MathMl,
}

impl Namespace {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            codes::namespace::HTML => Ok(Namespace::Html),
            codes::namespace::SVG => Ok(Namespace::Svg),
            codes::namespace::MATHML => Ok(Namespace::MathMl),
            _ => Err(Error::invalid_enum("namespace", code)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Html => "html",
            Namespace::Svg => "svg",
            Namespace::MathMl => "mathml",
        }
    }
}

/// Attribute namespace. An attribute with no namespace has
/// `Option::<AttributeNamespace>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeNamespace {
    Xlink,
    Xml,
    Xmlns,
}

impl AttributeNamespace {
    pub fn from_code(code: u32) -> Result<Option<Self>> {
        match code {
            codes::attr_namespace::NONE => Ok(None),
            codes::attr_namespace::XLINK => Ok(Some(AttributeNamespace::Xlink)),
            codes::attr_namespace::XML => Ok(Some(AttributeNamespace::Xml)),
            codes::attr_namespace::XMLNS => Ok(Some(AttributeNamespace::Xmlns)),
            _ => Err(Error::invalid_enum("attribute namespace", code)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeNamespace::Xlink => "xlink",
            AttributeNamespace::Xml => "xml",
            AttributeNamespace::Xmlns => "xmlns",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(NodeKind, QuirksMode, Namespace, AttributeNamespace);
