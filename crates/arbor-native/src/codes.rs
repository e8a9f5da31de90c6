//! Numeric codes used in [`RawOutput`](crate::RawOutput).
//!
//! These values are stable: consumers map them back to symbolic
//! vocabularies and treat anything outside the listed ranges as a version
//! mismatch.

/// Node kind codes.
pub mod node {
    pub const DOCUMENT: u32 = 0;
    pub const ELEMENT: u32 = 1;
    pub const TEXT: u32 = 2;
    pub const CDATA: u32 = 3;
    pub const COMMENT: u32 = 4;
    pub const WHITESPACE: u32 = 5;
}

/// Element namespace codes.
pub mod namespace {
    pub const HTML: u32 = 0;
    pub const SVG: u32 = 1;
    pub const MATHML: u32 = 2;
}

/// Attribute namespace codes. `NONE` marks an attribute without a namespace.
pub mod attr_namespace {
    pub const NONE: u32 = 0;
    pub const XLINK: u32 = 1;
    pub const XML: u32 = 2;
    pub const XMLNS: u32 = 3;
}

/// Document quirks mode codes.
pub mod quirks {
    pub const NO_QUIRKS: u32 = 0;
    pub const QUIRKS: u32 = 1;
    pub const LIMITED_QUIRKS: u32 = 2;
}

/// Insertion flag bits recorded in [`RawNode::parse_flags`](crate::RawNode).
///
/// Bit 2 is unassigned.
pub mod flags {
    pub const BY_PARSER: u32 = 1 << 0;
    pub const IMPLICIT_END_TAG: u32 = 1 << 1;
    pub const IMPLIED: u32 = 1 << 3;
    pub const CONVERTED_FROM_END_TAG: u32 = 1 << 4;
    pub const FROM_ISINDEX: u32 = 1 << 5;
    pub const FROM_IMAGE: u32 = 1 << 6;
    pub const RECONSTRUCTED_FORMATTING_ELEMENT: u32 = 1 << 7;
    pub const ADOPTION_AGENCY_CLONED: u32 = 1 << 8;
    pub const ADOPTION_AGENCY_MOVED: u32 = 1 << 9;
    pub const FOSTER_PARENTED: u32 = 1 << 10;
}
