/*
 * flags.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! How a node came to be inserted into the tree.

use std::fmt;

use arbor_native::codes::flags as bits;
use serde::{Serialize, Serializer, ser::SerializeSeq};

/// A single insertion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFlag {
    /// The node was created by the parser rather than directly from a token.
    ByParser,
    /// The element was closed without an end tag.
    ImplicitEndTag,
    /// The element was implied by the tree-construction rules.
    Implied,
    /// An end tag was converted into an element, as with `</p>` and `</br>`.
    ConvertedFromEndTag,
    FromIsindex,
    /// Created from an `<image>` tag and renamed to `img`.
    FromImage,
    ReconstructedFormattingElement,
    AdoptionAgencyCloned,
    AdoptionAgencyMoved,
    FosterParented,
}

/// Flags in bit order.
const FLAG_BITS: &[(ParseFlag, u32)] = &[
    (ParseFlag::ByParser, bits::BY_PARSER),
    (ParseFlag::ImplicitEndTag, bits::IMPLICIT_END_TAG),
    (ParseFlag::Implied, bits::IMPLIED),
    (ParseFlag::ConvertedFromEndTag, bits::CONVERTED_FROM_END_TAG),
    (ParseFlag::FromIsindex, bits::FROM_ISINDEX),
    (ParseFlag::FromImage, bits::FROM_IMAGE),
    (
        ParseFlag::ReconstructedFormattingElement,
        bits::RECONSTRUCTED_FORMATTING_ELEMENT,
    ),
    (ParseFlag::AdoptionAgencyCloned, bits::ADOPTION_AGENCY_CLONED),
    (ParseFlag::AdoptionAgencyMoved, bits::ADOPTION_AGENCY_MOVED),
    (ParseFlag::FosterParented, bits::FOSTER_PARENTED),
];

impl ParseFlag {
    pub fn bit(self) -> u32 {
        FLAG_BITS
            .iter()
            .find(|(flag, _)| *flag == self)
            .map_or(0, |(_, bit)| *bit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParseFlag::ByParser => "by_parser",
            ParseFlag::ImplicitEndTag => "implicit_end_tag",
            ParseFlag::Implied => "implied",
            ParseFlag::ConvertedFromEndTag => "converted_from_end_tag",
            ParseFlag::FromIsindex => "from_isindex",
            ParseFlag::FromImage => "from_image",
            ParseFlag::ReconstructedFormattingElement => "reconstructed_formatting_element",
            ParseFlag::AdoptionAgencyCloned => "adoption_agency_cloned",
            ParseFlag::AdoptionAgencyMoved => "adoption_agency_moved",
            ParseFlag::FosterParented => "foster_parented",
        }
    }
}

impl fmt::Display for ParseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`ParseFlag`]s. Iterates and serializes in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseFlags(u32);

impl ParseFlags {
    pub const EMPTY: ParseFlags = ParseFlags(0);

    /// Decode a parser bitmask. Bits with no assigned flag are dropped.
    pub fn from_bits(mask: u32) -> Self {
        let known = FLAG_BITS.iter().fold(0, |acc, (_, bit)| acc | bit);
        ParseFlags(mask & known)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, flag: ParseFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = ParseFlag> {
        FLAG_BITS
            .iter()
            .filter(move |(_, bit)| self.0 & bit != 0)
            .map(|(flag, _)| *flag)
    }
}

impl FromIterator<ParseFlag> for ParseFlags {
    fn from_iter<T: IntoIterator<Item = ParseFlag>>(iter: T) -> Self {
        ParseFlags(iter.into_iter().fold(0, |acc, flag| acc | flag.bit()))
    }
}

impl Serialize for ParseFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for flag in self.iter() {
            seq.serialize_element(&flag)?;
        }
        seq.end()
    }
}
