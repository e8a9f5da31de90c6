//! The tag table.
//!
//! A tag code is an index into [`TAG_NAMES`]. Names not in the table get
//! [`TAG_UNKNOWN`], which is one past the last entry.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Canonical lowercase tag names, indexed by tag code.
pub const TAG_NAMES: &[&str] = &[
    "html",
    "head",
    "title",
    "base",
    "link",
    "meta",
    "style",
    "script",
    "noscript",
    "template",
    "body",
    "article",
    "section",
    "nav",
    "aside",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hgroup",
    "header",
    "footer",
    "address",
    "p",
    "hr",
    "pre",
    "blockquote",
    "ol",
    "ul",
    "li",
    "dl",
    "dt",
    "dd",
    "figure",
    "figcaption",
    "main",
    "div",
    "a",
    "em",
    "strong",
    "small",
    "s",
    "cite",
    "q",
    "dfn",
    "abbr",
    "data",
    "time",
    "code",
    "var",
    "samp",
    "kbd",
    "sub",
    "sup",
    "i",
    "b",
    "u",
    "mark",
    "ruby",
    "rt",
    "rp",
    "bdi",
    "bdo",
    "span",
    "br",
    "wbr",
    "ins",
    "del",
    "image",
    "img",
    "iframe",
    "embed",
    "object",
    "param",
    "video",
    "audio",
    "source",
    "track",
    "canvas",
    "map",
    "area",
    "math",
    "mi",
    "mo",
    "mn",
    "ms",
    "mtext",
    "mglyph",
    "malignmark",
    "annotation-xml",
    "svg",
    "foreignobject",
    "desc",
    "table",
    "caption",
    "colgroup",
    "col",
    "tbody",
    "thead",
    "tfoot",
    "tr",
    "td",
    "th",
    "form",
    "fieldset",
    "legend",
    "label",
    "input",
    "button",
    "select",
    "datalist",
    "optgroup",
    "option",
    "textarea",
    "keygen",
    "output",
    "progress",
    "meter",
    "details",
    "summary",
    "menu",
    "menuitem",
    "applet",
    "acronym",
    "bgsound",
    "dir",
    "frame",
    "frameset",
    "noframes",
    "isindex",
    "listing",
    "xmp",
    "nextid",
    "noembed",
    "plaintext",
    "rb",
    "strike",
    "basefont",
    "big",
    "blink",
    "center",
    "font",
    "marquee",
    "multicol",
    "nobr",
    "spacer",
    "tt",
    "rtc",
];

/// Code for tags that are not in [`TAG_NAMES`].
pub const TAG_UNKNOWN: u32 = TAG_NAMES.len() as u32;

static TAG_INDEX: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    TAG_NAMES
        .iter()
        .enumerate()
        .map(|(code, name)| (*name, code as u32))
        .collect()
});

/// Canonical name for a tag code, or `None` for [`TAG_UNKNOWN`] and codes
/// past the end of the table.
pub fn tag_name(code: u32) -> Option<&'static str> {
    TAG_NAMES.get(code as usize).copied()
}

/// Tag code for a name, compared ASCII case-insensitively.
pub fn tag_from_name(name: &str) -> u32 {
    if let Some(code) = TAG_INDEX.get(name) {
        return *code;
    }
    if !name.bytes().any(|b| b.is_ascii_uppercase()) {
        return TAG_UNKNOWN;
    }
    let lowered = name.to_ascii_lowercase();
    TAG_INDEX.get(lowered.as_str()).copied().unwrap_or(TAG_UNKNOWN)
}

/// Extract the tag name from a raw start or end tag such as `<div a=1>` or
/// `</DIV >`. Returns `None` when the text is not a tag.
pub fn tag_name_in_original(original: &str) -> Option<&str> {
    let rest = original.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    if end == 0 { None } else { Some(&rest[..end]) }
}
