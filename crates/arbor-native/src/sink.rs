//! A `TreeSink` that records html5ever's tree operations into an index arena.
//!
//! html5ever only reports line numbers, so the sink also tracks the byte
//! span of the token being processed. The driver advances `cursor` before
//! every character it feeds and brackets each token with [`RawSink::enter`]
//! and [`RawSink::leave`]; node spans are derived from that state.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::mem;
use std::ops::Range;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{TagKind, Token};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, local_name, ns};
use tracing::trace;

use crate::codes;
use crate::driver::decode_attribute_value;
use crate::locate::{LineIndex, MarkupShape, attribute_spans, is_html_whitespace, markup_start};
use crate::options::Options;
use crate::output::{
    RawAttribute, RawDocument, RawElement, RawNode, RawOutput, RawPayload, RawText,
};
use crate::tags::tag_from_name;

pub(crate) type Handle = usize;

const DOCUMENT: Handle = 0;

const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "image", "img",
    "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// The token currently being processed.
#[derive(Debug, Clone)]
enum TokenContext {
    StartTag {
        name: LocalName,
        span: Range<usize>,
        self_closing: bool,
    },
    EndTag {
        name: LocalName,
        span: Range<usize>,
    },
    Text {
        span: Range<usize>,
        /// The characters of one `<![CDATA[...]]>` section.
        cdata: bool,
    },
    /// Comments, doctypes and end of file.
    Markup {
        span: Range<usize>,
    },
}

impl TokenContext {
    fn span(&self) -> Range<usize> {
        match self {
            TokenContext::StartTag { span, .. }
            | TokenContext::EndTag { span, .. }
            | TokenContext::Text { span, .. }
            | TokenContext::Markup { span } => span.clone(),
        }
    }
}

struct BuildAttribute {
    name: QualName,
    value: String,
    name_span: Range<usize>,
    value_span: Range<usize>,
}

impl BuildAttribute {
    fn unlocated(attribute: Attribute, at: usize) -> Self {
        Self {
            name: attribute.name,
            value: attribute.value.to_string(),
            name_span: at..at,
            value_span: at..at,
        }
    }
}

struct BuildElement {
    name: QualName,
    attributes: Vec<BuildAttribute>,
    /// Empty, positioned at the causing token, for parser-inserted elements.
    start_tag: Range<usize>,
    end_tag: Option<Range<usize>>,
    self_closing: bool,
    annotation_xml_integration_point: bool,
}

impl BuildElement {
    fn is_void(&self) -> bool {
        self.name.ns == ns!(html) && VOID_ELEMENTS.contains(&&*self.name.local)
    }

    fn closes_itself(&self) -> bool {
        self.is_void() || (self.self_closing && self.name.ns != ns!(html))
    }
}

enum BuildData {
    Document,
    Element(BuildElement),
    Text {
        text: String,
        span: Range<usize>,
        cdata: bool,
    },
    Comment { text: String, span: Range<usize> },
}

struct BuildNode {
    parent: Option<Handle>,
    children: Vec<Handle>,
    flags: u32,
    data: BuildData,
}

impl BuildNode {
    fn new(data: BuildData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            flags: 0,
            data,
        }
    }

    fn element(&self) -> Option<&BuildElement> {
        match &self.data {
            BuildData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self) -> Option<&mut BuildElement> {
        match &mut self.data {
            BuildData::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Owned element name handed to the tree builder.
#[derive(Debug)]
pub(crate) struct OwnedName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for OwnedName {
    fn ns(&self) -> &Namespace {
        &self.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.local
    }
}

struct Doctype {
    name: String,
    public_identifier: String,
    system_identifier: String,
}

pub(crate) struct RawSink<'a> {
    input: &'a str,
    tab_stop: u32,
    max_errors: Option<usize>,
    nodes: RefCell<Vec<BuildNode>>,
    doctype: RefCell<Option<Doctype>>,
    quirks_mode: Cell<u32>,
    errors: RefCell<Vec<String>>,
    /// Byte offset just past the last character fed to the tokenizer.
    cursor: Cell<usize>,
    /// End of the source consumed by the tokens emitted so far.
    emit_end: Cell<usize>,
    /// End of the last tag, comment or doctype.
    markup_end: Cell<usize>,
    token: RefCell<TokenContext>,
    /// Elements created while processing the current token.
    created: RefCell<Vec<Handle>>,
    /// Source range of the character tokens since the last markup token.
    text_run: Cell<Option<(usize, usize)>>,
    /// Part of `text_run` already given to a text node.
    text_claimed: Cell<usize>,
    /// Text node that most recently received characters from `text_run`.
    run_tail: Cell<Option<Handle>>,
    /// Elements still waiting for an end tag, by local name.
    unclosed: RefCell<HashMap<LocalName, Vec<Handle>>>,
}

impl<'a> RawSink<'a> {
    pub(crate) fn new(input: &'a str, options: &Options) -> Self {
        Self {
            input,
            tab_stop: options.tab_stop,
            max_errors: options.max_errors,
            nodes: RefCell::new(vec![BuildNode::new(BuildData::Document)]),
            doctype: RefCell::new(None),
            quirks_mode: Cell::new(codes::quirks::NO_QUIRKS),
            errors: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            emit_end: Cell::new(0),
            markup_end: Cell::new(0),
            token: RefCell::new(TokenContext::Markup { span: 0..0 }),
            created: RefCell::new(Vec::new()),
            text_run: Cell::new(None),
            text_claimed: Cell::new(0),
            run_tail: Cell::new(None),
            unclosed: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn advance(&self, cursor: usize) {
        self.cursor.set(cursor);
    }

    /// Record the span of a token before the tree builder sees it.
    pub(crate) fn enter(&self, token: &Token) {
        let cursor = self.cursor.get();
        let context = match token {
            Token::CharacterTokens(_) | Token::NullCharacterToken => {
                let start = self.emit_end.get();
                let end = cursor.max(start);
                let cdata = self
                    .input
                    .get(start..end)
                    .is_some_and(|raw| raw.starts_with("<![CDATA["));
                if cdata {
                    // a CDATA section is a run of its own
                    self.close_text_run(start);
                    self.reset_text_run();
                }
                let run_start = self.text_run.get().map_or(start, |(run_start, _)| run_start);
                self.text_run.set(Some((run_start, end)));
                self.emit_end.set(end);
                TokenContext::Text {
                    span: start..end,
                    cdata,
                }
            }
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => TokenContext::StartTag {
                    span: self.markup_span(cursor, MarkupShape::StartTag(&tag.name)),
                    name: tag.name.clone(),
                    self_closing: tag.self_closing,
                },
                TagKind::EndTag => TokenContext::EndTag {
                    span: self.markup_span(cursor, MarkupShape::EndTag(&tag.name)),
                    name: tag.name.clone(),
                },
            },
            Token::CommentToken(_) => TokenContext::Markup {
                span: self.markup_span(cursor, MarkupShape::Comment),
            },
            Token::DoctypeToken(_) => TokenContext::Markup {
                span: self.markup_span(cursor, MarkupShape::Doctype),
            },
            Token::EOFToken => {
                let end = self.input.len();
                self.close_text_run(end);
                TokenContext::Markup { span: end..end }
            }
            Token::ParseError(_) => return,
        };
        *self.token.borrow_mut() = context;
    }

    /// Settle flags and end tags for the token the tree builder just handled.
    pub(crate) fn leave(&self) {
        let context = self.token.borrow().clone();
        let created = mem::take(&mut *self.created.borrow_mut());
        self.classify_created(&context, &created);
        match &context {
            TokenContext::Text { cdata: false, .. } => {}
            TokenContext::Text { cdata: true, .. } => self.reset_text_run(),
            TokenContext::EndTag { name, span } => {
                self.record_end_tag(name, span.clone(), &created);
                self.reset_text_run();
            }
            _ => self.reset_text_run(),
        }
    }

    fn markup_span(&self, end: usize, shape: MarkupShape<'_>) -> Range<usize> {
        let floor = self.markup_end.get();
        let end = end.max(floor);
        let start = markup_start(self.input, floor, end, shape);
        self.close_text_run(start);
        self.markup_end.set(end);
        self.emit_end.set(end);
        start..end
    }

    /// End the current text run at `boundary`, the start of the markup that
    /// follows it.
    fn close_text_run(&self, boundary: usize) {
        let Some((start, end)) = self.text_run.get() else {
            return;
        };
        let close = boundary.max(start);
        self.text_run.set(Some((start, close)));
        let mut extended = false;
        if let Some(tail) = self.run_tail.get() {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(BuildData::Text { span, .. }) = nodes.get_mut(tail).map(|node| &mut node.data)
                && span.end == end
            {
                span.end = close.max(span.start);
                extended = true;
            }
        }
        if extended || self.text_claimed.get() > close {
            self.text_claimed.set(close);
        }
    }

    fn reset_text_run(&self) {
        self.text_run.set(None);
        self.text_claimed.set(0);
        self.run_tail.set(None);
    }

    /// Where the unclaimed part of the current run begins.
    fn unclaimed_start(&self) -> Option<usize> {
        self.text_run
            .get()
            .map(|(start, end)| start.max(self.text_claimed.get()).min(end))
    }

    /// Span for a new text node: the unclaimed part of the current run.
    fn claim_text_span(&self) -> Range<usize> {
        match self.text_run.get() {
            Some((start, end)) => {
                let start = start.max(self.text_claimed.get()).min(end);
                self.text_claimed.set(end);
                start..end
            }
            None => {
                let at = self.token.borrow().span().start;
                at..at
            }
        }
    }

    fn classify_created(&self, context: &TokenContext, created: &[Handle]) {
        if created.is_empty() {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        let token_element = match context {
            TokenContext::StartTag { name, .. } => created.iter().rev().copied().find(|&handle| {
                nodes[handle]
                    .element()
                    .is_some_and(|element| comes_from_start_tag(name, &element.name.local))
            }),
            _ => None,
        };

        for &handle in created {
            let node = &mut nodes[handle];
            let BuildData::Element(element) = &mut node.data else {
                continue;
            };

            if Some(handle) == token_element {
                if let TokenContext::StartTag {
                    name,
                    span,
                    self_closing,
                } = context
                {
                    element.start_tag = span.clone();
                    element.self_closing = *self_closing;
                    let attributes = mem::take(&mut element.attributes);
                    element.attributes = self.locate_attributes(attributes, span.clone(), true);
                    if element.closes_itself() {
                        self.forget_unclosed(handle, &element.name.local);
                    }
                    if &**name == "image" && element.name.local == local_name!("img") {
                        node.flags |= codes::flags::FROM_IMAGE;
                    }
                }
                continue;
            }

            let formatting = element.name.ns == ns!(html)
                && FORMATTING_ELEMENTS.contains(&&*element.name.local);
            let how = match context {
                TokenContext::EndTag { .. } if formatting => codes::flags::ADOPTION_AGENCY_CLONED,
                TokenContext::EndTag { name, .. } if *name == element.name.local => {
                    codes::flags::CONVERTED_FROM_END_TAG
                }
                _ if formatting => codes::flags::RECONSTRUCTED_FORMATTING_ELEMENT,
                _ => codes::flags::IMPLIED,
            };
            node.flags |= codes::flags::BY_PARSER | how;
        }
    }

    fn forget_unclosed(&self, handle: Handle, name: &LocalName) {
        if let Some(open) = self.unclosed.borrow_mut().get_mut(&end_tag_key(name)) {
            open.retain(|&h| h != handle);
        }
    }

    /// Give an end tag to the most recent element of that name still
    /// waiting for one. Formatting elements cloned by this same token only
    /// qualify when nothing older does.
    fn record_end_tag(&self, name: &LocalName, span: Range<usize>, created: &[Handle]) {
        let formatting = FORMATTING_ELEMENTS.contains(&&**name);
        let handle = {
            let mut unclosed = self.unclosed.borrow_mut();
            let Some(open) = unclosed.get_mut(name) else {
                return;
            };
            let Some(position) = open
                .iter()
                .rposition(|handle| !formatting || !created.contains(handle))
                .or_else(|| open.len().checked_sub(1))
            else {
                return;
            };
            open.remove(position)
        };
        if let Some(element) = self.nodes.borrow_mut()[handle].element_mut() {
            element.end_tag = Some(span);
        }
    }

    /// Attach source spans to attributes by matching them against the
    /// attributes written in the tag at `tag`. With `keep_duplicates`,
    /// repeated attributes the tokenizer dropped are restored in source
    /// order.
    fn locate_attributes(
        &self,
        attributes: Vec<BuildAttribute>,
        tag: Range<usize>,
        keep_duplicates: bool,
    ) -> Vec<BuildAttribute> {
        let raw_tag = self.input.get(tag.clone()).unwrap_or("");
        let mut pending: Vec<Option<BuildAttribute>> = attributes.into_iter().map(Some).collect();
        let mut seen: Vec<QualName> = Vec::new();
        let mut located = Vec::with_capacity(pending.len());

        for span in attribute_spans(raw_tag) {
            let name_span = tag.start + span.name.start..tag.start + span.name.end;
            let value_span = tag.start + span.value.start..tag.start + span.value.end;
            let source_name = &raw_tag[span.name.clone()];

            let found = pending.iter_mut().find(|slot| {
                slot.as_ref()
                    .is_some_and(|attribute| written_as(&attribute.name, source_name))
            });
            if let Some(slot) = found {
                if let Some(mut attribute) = slot.take() {
                    seen.push(attribute.name.clone());
                    attribute.name_span = name_span;
                    attribute.value_span = value_span;
                    located.push(attribute);
                }
                continue;
            }

            if !keep_duplicates {
                continue;
            }
            if let Some(name) = seen.iter().find(|name| written_as(name, source_name)) {
                located.push(BuildAttribute {
                    name: name.clone(),
                    value: decode_attribute_value(&raw_tag[span.value.clone()]),
                    name_span,
                    value_span,
                });
            }
        }

        located.extend(pending.into_iter().flatten());
        located
    }

    fn create_node(&self, data: BuildData) -> Handle {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(BuildNode::new(data));
        nodes.len() - 1
    }

    fn insert(&self, parent: Handle, before: Option<Handle>, child: NodeOrText<Handle>, foster: bool) {
        match child {
            NodeOrText::AppendNode(node) => self.insert_node(parent, before, node, foster),
            NodeOrText::AppendText(text) => self.insert_text(parent, before, &text, foster),
        }
    }

    fn insert_node(&self, parent: Handle, before: Option<Handle>, child: Handle, foster: bool) {
        let mut nodes = self.nodes.borrow_mut();
        detach(&mut nodes, child);
        let siblings = &mut nodes[parent].children;
        let position = before
            .and_then(|sibling| siblings.iter().position(|&h| h == sibling))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        let node = &mut nodes[child];
        node.parent = Some(parent);
        if foster {
            node.flags |= codes::flags::FOSTER_PARENTED;
        }
    }

    /// Characters continue the text node before them only when they follow
    /// it directly in the source. Anything in between, such as a table row
    /// the text was fostered around or an ignored tag, starts a new node.
    fn insert_text(&self, parent: Handle, before: Option<Handle>, text: &str, foster: bool) {
        let cdata = matches!(*self.token.borrow(), TokenContext::Text { cdata: true, .. });
        let continues_at = self.unclaimed_start();
        let mut nodes = self.nodes.borrow_mut();
        let siblings = &nodes[parent].children;
        let position = before
            .and_then(|sibling| siblings.iter().position(|&h| h == sibling))
            .unwrap_or(siblings.len());
        let previous = position.checked_sub(1).map(|i| siblings[i]);

        if let Some(previous) = previous
            && let BuildData::Text {
                text: existing,
                span,
                cdata: false,
            } = &mut nodes[previous].data
            && !cdata
            && continues_at == Some(span.end)
        {
            existing.push_str(text);
            if let Some((_, end)) = self.text_run.get() {
                span.end = span.end.max(end);
                self.text_claimed.set(end);
            }
            self.run_tail.set(Some(previous));
            return;
        }

        let span = self.claim_text_span();
        let mut node = BuildNode::new(BuildData::Text {
            text: text.to_string(),
            span,
            cdata,
        });
        node.parent = Some(parent);
        if foster {
            node.flags |= codes::flags::FOSTER_PARENTED;
        }
        let handle = nodes.len();
        nodes.push(node);
        nodes[parent].children.insert(position, handle);
        self.run_tail.set(Some(handle));
    }

    fn into_output(self) -> RawOutput<'a> {
        let RawSink {
            input,
            tab_stop,
            nodes,
            doctype,
            quirks_mode,
            errors,
            ..
        } = self;
        let nodes = nodes.into_inner();
        let index = LineIndex::new(input, tab_stop);

        let mut order = Vec::with_capacity(nodes.len());
        let mut visited = vec![false; nodes.len()];
        let mut stack = vec![DOCUMENT];
        while let Some(handle) = stack.pop() {
            if mem::replace(&mut visited[handle], true) {
                continue;
            }
            order.push(handle);
            stack.extend(nodes[handle].children.iter().rev());
        }

        // furthest source offset covered by each subtree
        let mut extent = vec![0usize; nodes.len()];
        for &handle in order.iter().rev() {
            let node = &nodes[handle];
            let own = match &node.data {
                BuildData::Document => 0,
                BuildData::Element(element) => element
                    .end_tag
                    .as_ref()
                    .map_or(element.start_tag.end, |end_tag| end_tag.end),
                BuildData::Text { span, .. } | BuildData::Comment { span, .. } => span.end,
            };
            let children = node.children.iter().map(|&child| extent[child]).max().unwrap_or(0);
            extent[handle] = own.max(children);
        }

        let mut index_within_parent = vec![0usize; nodes.len()];
        for node in &nodes {
            for (position, &child) in node.children.iter().enumerate() {
                index_within_parent[child] = position;
            }
        }

        let slice = move |range: &Range<usize>| input.get(range.clone()).unwrap_or("");
        let mut document_payload = Some(match doctype.into_inner() {
            Some(doctype) => RawDocument {
                has_doctype: true,
                name: Some(doctype.name),
                public_identifier: Some(doctype.public_identifier),
                system_identifier: Some(doctype.system_identifier),
                quirks_mode: quirks_mode.get(),
                ..RawDocument::default()
            },
            None => RawDocument {
                quirks_mode: quirks_mode.get(),
                ..RawDocument::default()
            },
        });

        let root = nodes[DOCUMENT]
            .children
            .iter()
            .copied()
            .find(|&child| nodes[child].element().is_some())
            .unwrap_or(DOCUMENT);

        let raw_nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(handle, node)| {
                let mut parse_flags = node.flags;
                let (kind, payload) = match node.data {
                    BuildData::Document => {
                        let mut document = document_payload.take().unwrap_or_default();
                        document.children = node.children;
                        (codes::node::DOCUMENT, RawPayload::Document(document))
                    }
                    BuildData::Element(element) => {
                        let closes_itself = element.closes_itself();
                        if element.end_tag.is_none() && !closes_itself {
                            parse_flags |= codes::flags::IMPLICIT_END_TAG;
                        }
                        let start_pos = index.position(element.start_tag.start);
                        let end_pos = match &element.end_tag {
                            Some(end_tag) => index.position(end_tag.start),
                            None if closes_itself => start_pos,
                            None => index.position(extent[handle]),
                        };
                        let attributes = element
                            .attributes
                            .iter()
                            .map(|attribute| RawAttribute {
                                attr_namespace: attribute_namespace_code(&attribute.name.ns),
                                name: attribute.name.local.to_string(),
                                original_name: slice(&attribute.name_span),
                                value: attribute.value.clone(),
                                original_value: slice(&attribute.value_span),
                                name_start: index.position(attribute.name_span.start),
                                name_end: index.position(attribute.name_span.end),
                                value_start: index.position(attribute.value_span.start),
                                value_end: index.position(attribute.value_span.end),
                            })
                            .collect();
                        let raw = RawElement {
                            children: node.children,
                            tag: tag_from_name(&element.name.local),
                            tag_namespace: namespace_code(&element.name.ns),
                            original_tag: slice(&element.start_tag),
                            original_end_tag: element.end_tag.as_ref().map_or("", slice),
                            start_pos,
                            end_pos,
                            attributes,
                        };
                        (codes::node::ELEMENT, RawPayload::Element(raw))
                    }
                    BuildData::Text { text, span, cdata } => {
                        let original_text = slice(&span);
                        let kind = if cdata {
                            codes::node::CDATA
                        } else if !text.is_empty() && is_html_whitespace(&text) {
                            codes::node::WHITESPACE
                        } else {
                            codes::node::TEXT
                        };
                        let raw = RawText {
                            text,
                            original_text,
                            start_pos: index.position(span.start),
                        };
                        (kind, RawPayload::Text(raw))
                    }
                    BuildData::Comment { text, span } => {
                        let raw = RawText {
                            text,
                            original_text: slice(&span),
                            start_pos: index.position(span.start),
                        };
                        (codes::node::COMMENT, RawPayload::Text(raw))
                    }
                };

                RawNode {
                    kind,
                    parse_flags,
                    parent: node.parent,
                    index_within_parent: index_within_parent[handle],
                    payload,
                }
            })
            .collect();

        RawOutput {
            document: DOCUMENT,
            root,
            nodes: raw_nodes,
            errors: errors.into_inner(),
        }
    }
}

fn detach(nodes: &mut [BuildNode], child: Handle) {
    if let Some(parent) = nodes[child].parent.take() {
        nodes[parent].children.retain(|&h| h != child);
    }
}

/// End tag tokens carry lowercase names; adjusted foreign names do not.
fn end_tag_key(local: &LocalName) -> LocalName {
    if local.bytes().any(|b| b.is_ascii_uppercase()) {
        LocalName::from(local.to_ascii_lowercase())
    } else {
        local.clone()
    }
}

/// Whether an element named `local` is the one a start tag named `token`
/// asked for.
fn comes_from_start_tag(token: &LocalName, local: &LocalName) -> bool {
    token.eq_ignore_ascii_case(local) || (&**token == "image" && &**local == "img")
}

/// Whether `source` is how an attribute with this name was written.
fn written_as(name: &QualName, source: &str) -> bool {
    match &name.prefix {
        Some(prefix) => source
            .split_once(':')
            .is_some_and(|(p, local)| p.eq_ignore_ascii_case(prefix) && local.eq_ignore_ascii_case(&name.local)),
        None => source.eq_ignore_ascii_case(&name.local),
    }
}

fn namespace_code(namespace: &Namespace) -> u32 {
    if *namespace == ns!(svg) {
        codes::namespace::SVG
    } else if *namespace == ns!(mathml) {
        codes::namespace::MATHML
    } else {
        codes::namespace::HTML
    }
}

fn attribute_namespace_code(namespace: &Namespace) -> u32 {
    if *namespace == ns!(xlink) {
        codes::attr_namespace::XLINK
    } else if *namespace == ns!(xml) {
        codes::attr_namespace::XML
    } else if *namespace == ns!(xmlns) {
        codes::attr_namespace::XMLNS
    } else {
        codes::attr_namespace::NONE
    }
}

impl<'a> TreeSink for RawSink<'a> {
    type Handle = Handle;
    type Output = RawOutput<'a>;
    type ElemName<'n>
        = OwnedName
    where
        Self: 'n;

    fn finish(self) -> RawOutput<'a> {
        self.into_output()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!(error = %msg, offset = self.cursor.get(), "html parse error");
        let mut errors = self.errors.borrow_mut();
        if self.max_errors.is_none_or(|max| errors.len() < max) {
            errors.push(msg.into_owned());
        }
    }

    fn get_document(&self) -> Handle {
        DOCUMENT
    }

    fn elem_name<'n>(&'n self, target: &'n Handle) -> OwnedName {
        let nodes = self.nodes.borrow();
        match nodes.get(*target).and_then(BuildNode::element) {
            Some(element) => OwnedName {
                ns: element.name.ns.clone(),
                local: element.name.local.clone(),
            },
            None => OwnedName {
                ns: ns!(),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> Handle {
        let at = self.token.borrow().span().start;
        let void = name.ns == ns!(html) && VOID_ELEMENTS.contains(&&*name.local);
        let local = name.local.clone();
        let handle = self.create_node(BuildData::Element(BuildElement {
            name,
            attributes: attrs
                .into_iter()
                .map(|attribute| BuildAttribute::unlocated(attribute, at))
                .collect(),
            start_tag: at..at,
            end_tag: None,
            self_closing: false,
            annotation_xml_integration_point: flags.mathml_annotation_xml_integration_point,
        }));
        if !void {
            self.unclosed
                .borrow_mut()
                .entry(end_tag_key(&local))
                .or_default()
                .push(handle);
        }
        self.created.borrow_mut().push(handle);
        handle
    }

    fn create_comment(&self, text: StrTendril) -> Handle {
        let span = self.token.borrow().span();
        self.create_node(BuildData::Comment {
            text: text.to_string(),
            span,
        })
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Handle {
        self.create_comment(StrTendril::from(format!("?{target} {data}")))
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        self.insert(*parent, None, child, false);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        let parent = self.nodes.borrow()[*element].parent;
        match parent {
            Some(parent) => self.insert(parent, Some(*element), child, true),
            None => self.insert(*prev_element, None, child, true),
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(Doctype {
            name: name.to_string(),
            public_identifier: public_id.to_string(),
            system_identifier: system_id.to_string(),
        });
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        *target
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(match mode {
            QuirksMode::NoQuirks => codes::quirks::NO_QUIRKS,
            QuirksMode::Quirks => codes::quirks::QUIRKS,
            QuirksMode::LimitedQuirks => codes::quirks::LIMITED_QUIRKS,
        });
    }

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        let parent = self.nodes.borrow()[*sibling].parent;
        if let Some(parent) = parent {
            self.insert(parent, Some(*sibling), new_node, true);
        }
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        let context = self.token.borrow().clone();
        let missing: Vec<BuildAttribute> = {
            let nodes = self.nodes.borrow();
            let Some(element) = nodes.get(*target).and_then(BuildNode::element) else {
                return;
            };
            attrs
                .into_iter()
                .filter(|attribute| !element.attributes.iter().any(|existing| existing.name == attribute.name))
                .map(|attribute| BuildAttribute::unlocated(attribute, context.span().start))
                .collect()
        };
        let located = match context {
            TokenContext::StartTag { span, .. } => self.locate_attributes(missing, span, false),
            _ => missing,
        };
        if let Some(element) = self.nodes.borrow_mut()[*target].element_mut() {
            element.attributes.extend(located);
        }
    }

    fn remove_from_parent(&self, target: &Handle) {
        let moved_by_adoption = matches!(*self.token.borrow(), TokenContext::EndTag { .. });
        let mut nodes = self.nodes.borrow_mut();
        detach(&mut nodes, *target);
        if moved_by_adoption {
            nodes[*target].flags |= codes::flags::ADOPTION_AGENCY_MOVED;
        }
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = mem::take(&mut nodes[*node].children);
        for &child in &children {
            nodes[child].parent = Some(*new_parent);
        }
        nodes[*new_parent].children.extend(children);
    }

    fn is_mathml_annotation_xml_integration_point(&self, handle: &Handle) -> bool {
        self.nodes
            .borrow()
            .get(*handle)
            .and_then(BuildNode::element)
            .is_some_and(|element| element.annotation_xml_integration_point)
    }

    fn allow_declarative_shadow_roots(&self, _intended_parent: &Handle) -> bool {
        false
    }
}
