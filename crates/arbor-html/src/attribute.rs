/*
 * attribute.rs
 * Copyright (c) 2025 Posit, PBC
 */

use arbor_native::RawAttribute;
use serde::Serialize;

use crate::error::Result;
use crate::position::SourcePosition;
use crate::vocab::AttributeNamespace;

/// One attribute of an element, as decoded and as written.
///
/// Elements keep every attribute the source contained, duplicates included,
/// in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute<'a> {
    namespace: Option<AttributeNamespace>,
    name: String,
    original_name: &'a str,
    value: String,
    original_value: &'a str,
    name_start: SourcePosition,
    name_end: SourcePosition,
    value_start: SourcePosition,
    value_end: SourcePosition,
}

impl<'a> Attribute<'a> {
    pub(crate) fn from_raw(raw: &RawAttribute<'a>) -> Result<Self> {
        Ok(Attribute {
            namespace: AttributeNamespace::from_code(raw.attr_namespace)?,
            name: raw.name.clone(),
            original_name: raw.original_name,
            value: raw.value.clone(),
            original_value: raw.original_value,
            name_start: SourcePosition::from(&raw.name_start),
            name_end: SourcePosition::from(&raw.name_end),
            value_start: SourcePosition::from(&raw.value_start),
            value_end: SourcePosition::from(&raw.value_end),
        })
    }

    /// `None` for ordinary attributes.
    pub fn namespace(&self) -> Option<AttributeNamespace> {
        self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original_name(&self) -> &'a str {
        self.original_name
    }

    /// The value with character references decoded.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as written, quotes included.
    pub fn original_value(&self) -> &'a str {
        self.original_value
    }

    pub fn name_start(&self) -> SourcePosition {
        self.name_start
    }

    pub fn name_end(&self) -> SourcePosition {
        self.name_end
    }

    pub fn value_start(&self) -> SourcePosition {
        self.value_start
    }

    pub fn value_end(&self) -> SourcePosition {
        self.value_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use arbor_native::{RawSourcePosition, codes};

    fn raw(attr_namespace: u32) -> RawAttribute<'static> {
        RawAttribute {
            attr_namespace,
            name: "href".to_string(),
            original_name: "HREF",
            value: "a&b".to_string(),
            original_value: "\"a&amp;b\"",
            name_start: RawSourcePosition { line: 1, column: 4, offset: 3 },
            name_end: RawSourcePosition { line: 1, column: 8, offset: 7 },
            value_start: RawSourcePosition { line: 1, column: 9, offset: 8 },
            value_end: RawSourcePosition { line: 1, column: 18, offset: 17 },
        }
    }

    #[test]
    fn test_copies_every_field() {
        let attribute = Attribute::from_raw(&raw(codes::attr_namespace::NONE)).unwrap();
        assert_eq!(attribute.namespace(), None);
        assert_eq!(attribute.name(), "href");
        assert_eq!(attribute.original_name(), "HREF");
        assert_eq!(attribute.value(), "a&b");
        assert_eq!(attribute.original_value(), "\"a&amp;b\"");
        assert_eq!(attribute.name_start(), SourcePosition::new(1, 4, 3));
        assert_eq!(attribute.value_end().offset, 17);
    }

    #[test]
    fn test_namespaced() {
        let attribute = Attribute::from_raw(&raw(codes::attr_namespace::XLINK)).unwrap();
        assert_eq!(attribute.namespace(), Some(AttributeNamespace::Xlink));
    }

    #[test]
    fn test_rejects_unknown_namespace() {
        let err = Attribute::from_raw(&raw(9)).unwrap_err();
        assert!(matches!(err, Error::InvalidEnum { code: 9, .. }));
    }
}
