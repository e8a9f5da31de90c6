/*
 * tag.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The closed set of element tags.

use std::collections::HashMap;
use std::fmt;

use arbor_native::{TAG_UNKNOWN, tag_name};
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use tracing::debug;

macro_rules! tags {
    ($($variant:ident => $name:literal,)+) => {
        /// An element tag.
        ///
        /// Discriminants are the parser's tag codes. Any code past the last
        /// known tag maps to [`Tag::Unknown`]; the element's original tag
        /// text then carries the name as written.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum Tag {
            $($variant,)+
            Unknown,
        }

        /// Every known tag, in code order.
        pub const KNOWN_TAGS: &[Tag] = &[$(Tag::$variant,)+];

        #[cfg(test)]
        const DECLARED_NAMES: &[&str] = &[$($name,)+];
    };
}

tags! {
    Html => "html",
    Head => "head",
    Title => "title",
    Base => "base",
    Link => "link",
    Meta => "meta",
    Style => "style",
    Script => "script",
    NoScript => "noscript",
    Template => "template",
    Body => "body",
    Article => "article",
    Section => "section",
    Nav => "nav",
    Aside => "aside",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    HGroup => "hgroup",
    Header => "header",
    Footer => "footer",
    Address => "address",
    P => "p",
    Hr => "hr",
    Pre => "pre",
    BlockQuote => "blockquote",
    Ol => "ol",
    Ul => "ul",
    Li => "li",
    Dl => "dl",
    Dt => "dt",
    Dd => "dd",
    Figure => "figure",
    FigCaption => "figcaption",
    Main => "main",
    Div => "div",
    A => "a",
    Em => "em",
    Strong => "strong",
    Small => "small",
    S => "s",
    Cite => "cite",
    Q => "q",
    Dfn => "dfn",
    Abbr => "abbr",
    Data => "data",
    Time => "time",
    Code => "code",
    Var => "var",
    Samp => "samp",
    Kbd => "kbd",
    Sub => "sub",
    Sup => "sup",
    I => "i",
    B => "b",
    U => "u",
    Mark => "mark",
    Ruby => "ruby",
    Rt => "rt",
    Rp => "rp",
    Bdi => "bdi",
    Bdo => "bdo",
    Span => "span",
    Br => "br",
    Wbr => "wbr",
    Ins => "ins",
    Del => "del",
    Image => "image",
    Img => "img",
    Iframe => "iframe",
    Embed => "embed",
    Object => "object",
    Param => "param",
    Video => "video",
    Audio => "audio",
    Source => "source",
    Track => "track",
    Canvas => "canvas",
    Map => "map",
    Area => "area",
    Math => "math",
    Mi => "mi",
    Mo => "mo",
    Mn => "mn",
    Ms => "ms",
    MText => "mtext",
    MGlyph => "mglyph",
    MAlignMark => "malignmark",
    AnnotationXml => "annotation-xml",
    Svg => "svg",
    ForeignObject => "foreignobject",
    Desc => "desc",
    Table => "table",
    Caption => "caption",
    ColGroup => "colgroup",
    Col => "col",
    Tbody => "tbody",
    Thead => "thead",
    Tfoot => "tfoot",
    Tr => "tr",
    Td => "td",
    Th => "th",
    Form => "form",
    FieldSet => "fieldset",
    Legend => "legend",
    Label => "label",
    Input => "input",
    Button => "button",
    Select => "select",
    DataList => "datalist",
    OptGroup => "optgroup",
    Option => "option",
    TextArea => "textarea",
    KeyGen => "keygen",
    Output => "output",
    Progress => "progress",
    Meter => "meter",
    Details => "details",
    Summary => "summary",
    Menu => "menu",
    MenuItem => "menuitem",
    Applet => "applet",
    Acronym => "acronym",
    BgSound => "bgsound",
    Dir => "dir",
    Frame => "frame",
    FrameSet => "frameset",
    NoFrames => "noframes",
    IsIndex => "isindex",
    Listing => "listing",
    Xmp => "xmp",
    NextId => "nextid",
    NoEmbed => "noembed",
    PlainText => "plaintext",
    Rb => "rb",
    Strike => "strike",
    BaseFont => "basefont",
    Big => "big",
    Blink => "blink",
    Center => "center",
    Font => "font",
    Marquee => "marquee",
    MultiCol => "multicol",
    Nobr => "nobr",
    Spacer => "spacer",
    Tt => "tt",
    Rtc => "rtc",
}

static VOCABULARY: Lazy<HashMap<&'static str, Tag>> = Lazy::new(|| {
    let vocabulary: HashMap<_, _> = KNOWN_TAGS
        .iter()
        .filter_map(|tag| tag.name().map(|name| (name, *tag)))
        .collect();
    debug!(tags = vocabulary.len(), "registered tag vocabulary");
    vocabulary
});

/// Build the name lookup table ahead of the first parse.
pub(crate) fn register() {
    Lazy::force(&VOCABULARY);
}

impl Tag {
    /// Map a parser tag code. Codes outside the known range are
    /// [`Tag::Unknown`] rather than an error.
    pub fn from_code(code: u32) -> Tag {
        KNOWN_TAGS.get(code as usize).copied().unwrap_or(Tag::Unknown)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Canonical lowercase name, `None` for [`Tag::Unknown`].
    pub fn name(self) -> Option<&'static str> {
        match self {
            Tag::Unknown => None,
            known => tag_name(known.code()),
        }
    }

    /// Look up a tag by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Tag {
        if let Some(tag) = VOCABULARY.get(name) {
            return *tag;
        }
        VOCABULARY
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(Tag::Unknown)
    }

    pub fn is_unknown(self) -> bool {
        self == Tag::Unknown
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("unknown"))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name().unwrap_or("unknown"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_native::TAG_NAMES;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variants_follow_the_parser_table() {
        assert_eq!(DECLARED_NAMES, TAG_NAMES);
        assert_eq!(KNOWN_TAGS.len() as u32, TAG_UNKNOWN);
        assert_eq!(Tag::Unknown.code(), TAG_UNKNOWN);
        for (code, tag) in KNOWN_TAGS.iter().enumerate() {
            assert_eq!(tag.code(), code as u32);
            let debug_name = format!("{tag:?}").to_ascii_lowercase();
            assert_eq!(debug_name, TAG_NAMES[code].replace('-', ""));
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Tag::from_code(0), Tag::Html);
        assert_eq!(Tag::from_code(TAG_UNKNOWN - 1), Tag::Rtc);
        assert_eq!(Tag::from_code(TAG_UNKNOWN), Tag::Unknown);
        assert_eq!(Tag::from_code(u32::MAX), Tag::Unknown);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Tag::from_name("body"), Tag::Body);
        assert_eq!(Tag::from_name("TBODY"), Tag::Tbody);
        assert_eq!(Tag::from_name("foreignObject"), Tag::ForeignObject);
        assert_eq!(Tag::from_name("annotation-xml"), Tag::AnnotationXml);
        assert_eq!(Tag::from_name("foo-bar"), Tag::Unknown);
    }

    #[test]
    fn test_names() {
        assert_eq!(Tag::Div.name(), Some("div"));
        assert_eq!(Tag::Unknown.name(), None);
        assert_eq!(Tag::Unknown.to_string(), "unknown");
        assert_eq!(serde_json::to_value(Tag::Svg).unwrap(), "svg");
    }
}
