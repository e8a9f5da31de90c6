/*
 * lifecycle.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Running the parser and releasing its output.
//!
//! The parser's output is held by an [`OutputGuard`] from the moment it is
//! produced. The guard hands it back to the parser's `destroy` exactly once,
//! whether graph construction succeeds, fails, or unwinds.

use arbor_native::{Options, RawOutput};
use tracing::{debug, warn};

use crate::builder::build_document;
use crate::error::{Error, Result};
use crate::node::Document;
use crate::tag;

/// The tree-construction backend.
///
/// `run` returns `None` when it cannot produce a tree. Every output it does
/// return is passed to `destroy` exactly once.
pub trait TreeParser {
    fn run<'a>(&self, input: &'a str) -> Option<RawOutput<'a>>;

    fn destroy(&self, output: RawOutput<'_>);
}

/// The html5ever-backed parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlParser {
    options: Options,
}

impl HtmlParser {
    pub fn new(options: Options) -> Self {
        HtmlParser { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse `input` into a [`Document`]. See [`parse`].
    pub fn parse<'a, I>(&self, input: &'a I) -> Result<Document<'a>>
    where
        I: AsRef<[u8]> + ?Sized,
    {
        parse_using(self, input)
    }

    /// Parse `input` and pass the document to `consumer`. See [`parse_with`].
    pub fn parse_with<I, F, R>(&self, input: &I, consumer: F) -> Result<R>
    where
        I: AsRef<[u8]> + ?Sized,
        F: FnOnce(Document<'_>) -> R,
    {
        parse_using(self, input).map(consumer)
    }
}

impl TreeParser for HtmlParser {
    fn run<'a>(&self, input: &'a str) -> Option<RawOutput<'a>> {
        arbor_native::parse_with_options(&self.options, input)
    }

    fn destroy(&self, output: RawOutput<'_>) {
        arbor_native::destroy_output(output);
    }
}

struct OutputGuard<'p, 'a, P: TreeParser + ?Sized> {
    parser: &'p P,
    output: RawOutput<'a>,
}

impl<P: TreeParser + ?Sized> Drop for OutputGuard<'_, '_, P> {
    fn drop(&mut self) {
        self.parser.destroy(std::mem::take(&mut self.output));
    }
}

/// Parse `input` with default options.
///
/// The input must be UTF-8; anything else fails with [`Error::Encoding`]
/// before the parser runs. The returned document borrows `input` for its
/// original-text fields.
///
/// ```rust
/// let document = arbor_html::parse("<!DOCTYPE html><title>Hi</title>").unwrap();
/// assert!(document.has_doctype());
/// assert_eq!(document.title().as_deref(), Some("Hi"));
/// ```
pub fn parse<I>(input: &I) -> Result<Document<'_>>
where
    I: AsRef<[u8]> + ?Sized,
{
    parse_using(&HtmlParser::default(), input)
}

/// Parse `input` and return what `consumer` makes of the document.
pub fn parse_with<I, F, R>(input: &I, consumer: F) -> Result<R>
where
    I: AsRef<[u8]> + ?Sized,
    F: FnOnce(Document<'_>) -> R,
{
    parse_using(&HtmlParser::default(), input).map(consumer)
}

/// Parse `input` with an arbitrary [`TreeParser`].
pub fn parse_using<'a, P, I>(parser: &P, input: &'a I) -> Result<Document<'a>>
where
    P: TreeParser + ?Sized,
    I: AsRef<[u8]> + ?Sized,
{
    tag::register();
    let bytes = input.as_ref();
    let text = std::str::from_utf8(bytes).inspect_err(|err| {
        debug!(valid_up_to = err.valid_up_to(), "rejected input that is not UTF-8");
    })?;

    let Some(output) = parser.run(text) else {
        warn!(bytes = text.len(), "parser produced no output");
        return Err(Error::Parse {
            reason: "the parser produced no output".to_string(),
        });
    };
    let guard = OutputGuard { parser, output };
    let document = build_document(&guard.output)?;
    debug!(nodes = document.node_count(), "parsed html document");
    Ok(document)
}
