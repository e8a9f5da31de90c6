//! Feeding input through html5ever.

use std::cell::RefCell;

use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{BufferQueue, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts};
use html5ever::tree_builder::{TreeBuilder, TreeBuilderOpts, TreeSink};

use crate::options::Options;
use crate::output::RawOutput;
use crate::sink::{Handle, RawSink};

/// Sits between the tokenizer and the tree builder so the sink knows which
/// token every tree operation belongs to.
struct Intercept<'a> {
    builder: TreeBuilder<Handle, RawSink<'a>>,
}

impl TokenSink for Intercept<'_> {
    type Handle = Handle;

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<Handle> {
        if matches!(token, Token::ParseError(_)) {
            return self.builder.process_token(token, line_number);
        }
        self.builder.sink.enter(&token);
        let result = self.builder.process_token(token, line_number);
        self.builder.sink.leave();
        result
    }

    fn end(&self) {
        self.builder.end();
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        self.builder
            .adjusted_current_node_present_but_not_in_html_namespace()
    }
}

/// Run tree construction over `input`.
///
/// Characters are fed one at a time so that every token is emitted while
/// the sink's cursor sits just past its last character.
pub(crate) fn run<'a>(input: &'a str, options: &Options) -> RawOutput<'a> {
    let builder_opts = TreeBuilderOpts {
        scripting_enabled: options.scripting_enabled,
        ..TreeBuilderOpts::default()
    };
    let intercept = Intercept {
        builder: TreeBuilder::new(RawSink::new(input, options), builder_opts),
    };
    let tokenizer = Tokenizer::new(intercept, TokenizerOpts::default());

    let queue = BufferQueue::default();
    for (offset, ch) in input.char_indices() {
        let end = offset + ch.len_utf8();
        tokenizer.sink.builder.sink.advance(end);
        queue.push_back(StrTendril::from_slice(&input[offset..end]));
        while let TokenizerResult::Script(_) = tokenizer.feed(&queue) {}
    }
    tokenizer.sink.builder.sink.advance(input.len());
    tokenizer.end();

    tokenizer.sink.builder.sink.finish()
}

#[derive(Default)]
struct FirstAttributeValue(RefCell<Option<String>>);

impl TokenSink for FirstAttributeValue {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if let Token::TagToken(tag) = token
            && let Some(attribute) = tag.attrs.first()
        {
            self.0
                .borrow_mut()
                .get_or_insert_with(|| attribute.value.to_string());
        }
        TokenSinkResult::Continue
    }
}

/// Decode a raw attribute value (quotes included) the way the tokenizer
/// decodes values in a start tag.
pub(crate) fn decode_attribute_value(raw_value: &str) -> String {
    if raw_value.is_empty() {
        return String::new();
    }
    let tokenizer = Tokenizer::new(FirstAttributeValue::default(), TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from(format!("<x a={raw_value}>")));
    while let TokenizerResult::Script(()) = tokenizer.feed(&queue) {}
    tokenizer.end();
    tokenizer.sink.0.into_inner().unwrap_or_default()
}
