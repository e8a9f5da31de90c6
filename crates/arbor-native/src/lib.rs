//! HTML5 tree construction with index-linked raw output.
//!
//! This crate runs [`html5ever`] over a UTF-8 string and records the result
//! as a flat [`RawOutput`]: nodes addressed by index, enumerations encoded as
//! the numeric [`codes`], and verbatim source slices with byte offsets,
//! lines and columns for every element, attribute and text node.
//!
//! The output is a plain value. It borrows the input for its `original_*`
//! slices and is released with [`destroy_output`].
//!
//! # Example
//!
//! ```rust
//! use arbor_native::{RawPayload, codes, parse};
//!
//! let input = "<p class=intro>Hello</p>";
//! let output = parse(input).expect("tree construction succeeds");
//!
//! let paragraph = output
//!     .nodes
//!     .iter()
//!     .find_map(|node| match &node.payload {
//!         RawPayload::Element(element) if element.original_tag.starts_with("<p") => Some(element),
//!         _ => None,
//!     })
//!     .unwrap();
//! assert_eq!(paragraph.original_tag, "<p class=intro>");
//! assert_eq!(paragraph.attributes[0].original_value, "intro");
//! assert_eq!(paragraph.tag_namespace, codes::namespace::HTML);
//!
//! arbor_native::destroy_output(output);
//! ```

pub mod codes;
mod driver;
mod locate;
pub mod options;
pub mod output;
mod sink;
pub mod tags;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace, warn};

pub use options::Options;
pub use output::{
    RawAttribute, RawDocument, RawElement, RawNode, RawOutput, RawPayload, RawSourcePosition,
    RawText,
};
pub use tags::{TAG_NAMES, TAG_UNKNOWN, tag_from_name, tag_name, tag_name_in_original};

/// Parse `input` with default [`Options`].
pub fn parse(input: &str) -> Option<RawOutput<'_>> {
    parse_with_options(&Options::default(), input)
}

/// Parse `input`. Returns `None` if tree construction failed to produce an
/// output.
pub fn parse_with_options<'a>(options: &Options, input: &'a str) -> Option<RawOutput<'a>> {
    match panic::catch_unwind(AssertUnwindSafe(|| driver::run(input, options))) {
        Ok(output) => {
            debug!(
                bytes = input.len(),
                nodes = output.nodes.len(),
                errors = output.errors.len(),
                "built html tree"
            );
            Some(output)
        }
        Err(_) => {
            warn!(bytes = input.len(), "html tree construction aborted");
            None
        }
    }
}

/// Release an output returned by [`parse`].
pub fn destroy_output(output: RawOutput<'_>) {
    trace!(nodes = output.nodes.len(), "released html tree");
    drop(output);
}
