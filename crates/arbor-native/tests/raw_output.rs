//! Tree construction tests against the raw output.

use arbor_native::{
    RawElement, RawNode, RawOutput, RawPayload, RawText, codes, parse, tag_from_name,
};
use pretty_assertions::assert_eq;

fn elements<'o, 'a>(output: &'o RawOutput<'a>, name: &str) -> Vec<(&'o RawNode<'a>, &'o RawElement<'a>)> {
    let tag = tag_from_name(name);
    output
        .nodes
        .iter()
        .filter_map(|node| match &node.payload {
            RawPayload::Element(element) if element.tag == tag => Some((node, element)),
            _ => None,
        })
        .collect()
}

fn element<'o, 'a>(output: &'o RawOutput<'a>, name: &str) -> (&'o RawNode<'a>, &'o RawElement<'a>) {
    elements(output, name)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no <{name}> element"))
}

fn texts<'o, 'a>(output: &'o RawOutput<'a>) -> Vec<(&'o RawNode<'a>, &'o RawText<'a>)> {
    output
        .nodes
        .iter()
        .filter_map(|node| match &node.payload {
            RawPayload::Text(text) if node.kind != codes::node::COMMENT => Some((node, text)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_simple_document_shape() {
    let output = parse("<html><body>Hi</body></html>").unwrap();
    let document = output.document_node().unwrap();
    assert_eq!(document.kind, codes::node::DOCUMENT);
    assert_eq!(document.children(), &[output.root]);

    let (html_node, html) = element(&output, "html");
    assert_eq!(html_node.parent, Some(output.document));
    assert_eq!(html.original_tag, "<html>");
    assert_eq!(html.original_end_tag, "</html>");

    let (_, body) = element(&output, "body");
    assert_eq!(body.original_tag, "<body>");
    assert_eq!(body.original_end_tag, "</body>");
    assert_eq!(body.start_pos.offset, 6);
    assert_eq!(body.end_pos.offset, 14);
    assert_eq!(body.children.len(), 1);

    let text = &output.nodes[body.children[0]];
    assert_eq!(text.kind, codes::node::TEXT);
    match &text.payload {
        RawPayload::Text(text) => {
            assert_eq!(text.text, "Hi");
            assert_eq!(text.original_text, "Hi");
            assert_eq!(text.start_pos.offset, 12);
            assert_eq!(text.start_pos.column, 13);
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_implied_elements_are_flagged() {
    let output = parse("<html><body>Hi</body></html>").unwrap();
    let (head_node, head) = element(&output, "head");
    assert_eq!(head.original_tag, "");
    assert_eq!(head.start_pos.offset, 6);
    assert_ne!(head_node.parse_flags & codes::flags::IMPLIED, 0);
    assert_ne!(head_node.parse_flags & codes::flags::BY_PARSER, 0);
    assert_ne!(head_node.parse_flags & codes::flags::IMPLICIT_END_TAG, 0);

    let (body_node, _) = element(&output, "body");
    assert_eq!(body_node.parse_flags, 0);
}

#[test]
fn test_doctype_and_quirks() {
    let output = parse("<!DOCTYPE html>").unwrap();
    match &output.document_node().unwrap().payload {
        RawPayload::Document(document) => {
            assert!(document.has_doctype);
            assert_eq!(document.name.as_deref(), Some("html"));
            assert_eq!(document.public_identifier.as_deref(), Some(""));
            assert_eq!(document.quirks_mode, codes::quirks::NO_QUIRKS);
        }
        other => panic!("expected document, got {other:?}"),
    }

    let output = parse("<p>no doctype").unwrap();
    match &output.document_node().unwrap().payload {
        RawPayload::Document(document) => {
            assert!(!document.has_doctype);
            assert_eq!(document.name, None);
            assert_eq!(document.quirks_mode, codes::quirks::QUIRKS);
        }
        other => panic!("expected document, got {other:?}"),
    }
}

#[test]
fn test_unknown_tag_keeps_original_text() {
    let output = parse("<foo-bar></foo-bar>").unwrap();
    let unknown = output
        .nodes
        .iter()
        .find_map(|node| match &node.payload {
            RawPayload::Element(element) if element.tag == arbor_native::TAG_UNKNOWN => Some(element),
            _ => None,
        })
        .unwrap();
    assert_eq!(unknown.original_tag, "<foo-bar>");
    assert_eq!(unknown.original_end_tag, "</foo-bar>");
}

#[test]
fn test_duplicate_attributes_survive_in_order() {
    let input = r#"<div a="1" a="2">"#;
    let output = parse(input).unwrap();
    let (node, div) = element(&output, "div");
    let attributes: Vec<_> = div
        .attributes
        .iter()
        .map(|attribute| (attribute.name.as_str(), attribute.value.as_str(), attribute.original_value))
        .collect();
    assert_eq!(attributes, vec![("a", "1", r#""1""#), ("a", "2", r#""2""#)]);

    let second = &div.attributes[1];
    assert_eq!(second.name_start.offset, 11);
    assert_eq!(second.name_end.offset, 12);
    assert_eq!(second.value_start.offset, 13);
    assert_eq!(second.value_end.offset, 16);
    assert_ne!(node.parse_flags & codes::flags::IMPLICIT_END_TAG, 0);
}

#[test]
fn test_attribute_values_are_decoded() {
    let output = parse("<a href='?x=1&amp;y=2' title=A&lt;B>link</a>").unwrap();
    let (_, anchor) = element(&output, "a");
    assert_eq!(anchor.attributes[0].value, "?x=1&y=2");
    assert_eq!(anchor.attributes[0].original_value, "'?x=1&amp;y=2'");
    assert_eq!(anchor.attributes[1].value, "A<B");
    assert_eq!(anchor.attributes[1].original_name, "title");
}

#[test]
fn test_original_spans_match_offsets() {
    let input = "<!DOCTYPE html>\n<html>\n  <body class=\"main\">\n    <p>one &amp; two</p>\n    <!-- note -->\n  </body>\n</html>\n";
    let output = parse(input).unwrap();
    for node in &output.nodes {
        match &node.payload {
            RawPayload::Element(element) => {
                let start = element.start_pos.offset as usize;
                assert_eq!(&input[start..start + element.original_tag.len()], element.original_tag);
                let end = element.end_pos.offset as usize;
                assert_eq!(&input[end..end + element.original_end_tag.len()], element.original_end_tag);
                for attribute in &element.attributes {
                    let name = attribute.name_start.offset as usize..attribute.name_end.offset as usize;
                    assert_eq!(&input[name], attribute.original_name);
                    let value = attribute.value_start.offset as usize..attribute.value_end.offset as usize;
                    assert_eq!(&input[value], attribute.original_value);
                }
            }
            RawPayload::Text(text) => {
                let start = text.start_pos.offset as usize;
                assert_eq!(&input[start..start + text.original_text.len()], text.original_text);
            }
            RawPayload::Document(_) => {}
        }
    }
}

#[test]
fn test_text_and_comment_spans() {
    let input = "<p>one &amp; two</p><!-- note -->";
    let output = parse(input).unwrap();
    let (_, p) = element(&output, "p");
    match &output.nodes[p.children[0]].payload {
        RawPayload::Text(text) => {
            assert_eq!(text.text, "one & two");
            assert_eq!(text.original_text, "one &amp; two");
        }
        other => panic!("expected text, got {other:?}"),
    }

    let comment = output
        .nodes
        .iter()
        .find(|node| node.kind == codes::node::COMMENT)
        .unwrap();
    match &comment.payload {
        RawPayload::Text(text) => {
            assert_eq!(text.text, " note ");
            assert_eq!(text.original_text, "<!-- note -->");
            assert_eq!(text.start_pos.offset, 20);
        }
        other => panic!("expected comment, got {other:?}"),
    }
}

#[test]
fn test_lines_and_columns() {
    let input = "<p>\n\t<b>x</b>\r\n<i>y</i></p>";
    let output = parse(input).unwrap();
    let (_, b) = element(&output, "b");
    assert_eq!((b.start_pos.line, b.start_pos.column, b.start_pos.offset), (2, 9, 5));
    let (_, i) = element(&output, "i");
    assert_eq!((i.start_pos.line, i.start_pos.column), (3, 1));
}

#[test]
fn test_whitespace_nodes() {
    let output = parse("<div>\n  <span>x</span>\n</div>").unwrap();
    let kinds: Vec<_> = texts(&output).iter().map(|(node, text)| (node.kind, text.text.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (codes::node::WHITESPACE, "\n  "),
            (codes::node::TEXT, "x"),
            (codes::node::WHITESPACE, "\n"),
        ]
    );
}

#[test]
fn test_cdata_in_foreign_content() {
    let output = parse("<svg><![CDATA[x<y]]></svg>").unwrap();
    let (_, svg) = element(&output, "svg");
    assert_eq!(svg.tag_namespace, codes::namespace::SVG);
    let child = &output.nodes[svg.children[0]];
    assert_eq!(child.kind, codes::node::CDATA);
    match &child.payload {
        RawPayload::Text(text) => {
            assert_eq!(text.text, "x<y");
            assert_eq!(text.original_text, "<![CDATA[x<y]]>");
        }
        other => panic!("expected cdata, got {other:?}"),
    }
}

#[test]
fn test_cdata_between_text_is_its_own_node() {
    let output = parse("<svg>abc<![CDATA[x<y]]>def</svg>").unwrap();
    let (_, svg) = element(&output, "svg");
    let children: Vec<_> = svg
        .children
        .iter()
        .map(|&child| match &output.nodes[child].payload {
            RawPayload::Text(text) => (output.nodes[child].kind, text.text.as_str(), text.original_text),
            other => panic!("expected text, got {other:?}"),
        })
        .collect();
    assert_eq!(
        children,
        vec![
            (codes::node::TEXT, "abc", "abc"),
            (codes::node::CDATA, "x<y", "<![CDATA[x<y]]>"),
            (codes::node::TEXT, "def", "def"),
        ]
    );
}

#[test]
fn test_foreign_namespaces() {
    let output = parse(r##"<svg><a xlink:href="#x"/></svg><math><mi>x</mi></math>"##).unwrap();
    let (_, mi) = element(&output, "mi");
    assert_eq!(mi.tag_namespace, codes::namespace::MATHML);

    let anchor = output
        .nodes
        .iter()
        .find_map(|node| match &node.payload {
            RawPayload::Element(element) if element.tag_namespace == codes::namespace::SVG && !element.attributes.is_empty() => {
                Some(element)
            }
            _ => None,
        })
        .unwrap();
    let href = &anchor.attributes[0];
    assert_eq!(href.attr_namespace, codes::attr_namespace::XLINK);
    assert_eq!(href.name, "href");
    assert_eq!(href.original_name, "xlink:href");
    assert_eq!(anchor.original_tag, r##"<a xlink:href="#x"/>"##);
}

#[test]
fn test_void_and_self_closing_elements_close_themselves() {
    let output = parse("<p>a<br>b<svg><circle/></svg></p>").unwrap();
    let (br_node, br) = element(&output, "br");
    assert_eq!(br.original_end_tag, "");
    assert_eq!(br.end_pos, br.start_pos);
    assert_eq!(br_node.parse_flags & codes::flags::IMPLICIT_END_TAG, 0);

    let circle = output
        .nodes
        .iter()
        .find(|node| match &node.payload {
            RawPayload::Element(element) => element.original_tag == "<circle/>",
            _ => false,
        })
        .unwrap();
    assert_eq!(circle.parse_flags & codes::flags::IMPLICIT_END_TAG, 0);
}

#[test]
fn test_implicit_end_position_covers_content() {
    let output = parse("<p>one<p>two").unwrap();
    let paragraphs = elements(&output, "p");
    let (first_node, first) = paragraphs[0];
    assert_ne!(first_node.parse_flags & codes::flags::IMPLICIT_END_TAG, 0);
    assert_eq!(first.original_end_tag, "");
    assert_eq!(first.end_pos.offset, 6);
}

#[test]
fn test_end_tag_converted_to_element() {
    let output = parse("<div></p></div>").unwrap();
    let (p_node, p) = element(&output, "p");
    assert_ne!(p_node.parse_flags & codes::flags::CONVERTED_FROM_END_TAG, 0);
    assert_ne!(p_node.parse_flags & codes::flags::BY_PARSER, 0);
    assert_eq!(p.original_tag, "");
    assert_eq!(p.original_end_tag, "</p>");
}

#[test]
fn test_image_becomes_img() {
    let output = parse("<image src=a.png>").unwrap();
    let (node, img) = element(&output, "img");
    assert_ne!(node.parse_flags & codes::flags::FROM_IMAGE, 0);
    assert_eq!(img.original_tag, "<image src=a.png>");
    assert_eq!(img.attributes[0].value, "a.png");
}

#[test]
fn test_foster_parented_text() {
    let output = parse("<table>x<tr><td>y</td></tr></table>").unwrap();
    let (text_node, text) = texts(&output)
        .into_iter()
        .find(|(_, text)| text.text == "x")
        .unwrap();
    assert_ne!(text_node.parse_flags & codes::flags::FOSTER_PARENTED, 0);
    assert_eq!(text.original_text, "x");

    let (_, table) = element(&output, "table");
    assert_eq!(table.children.len(), 1);
    let tbody = &output.nodes[table.children[0]];
    assert!(matches!(&tbody.payload, RawPayload::Element(e) if e.tag == tag_from_name("tbody")));
    assert_ne!(tbody.parse_flags & codes::flags::IMPLIED, 0);
}

#[test]
fn test_foster_parented_text_around_a_row() {
    let input = "<table>x<tr><td>1</td></tr>y</table>";
    let output = parse(input).unwrap();
    let fostered: Vec<_> = texts(&output)
        .into_iter()
        .filter(|(node, _)| node.parse_flags & codes::flags::FOSTER_PARENTED != 0)
        .map(|(_, text)| (text.text.as_str(), text.original_text, text.start_pos.offset))
        .collect();
    assert_eq!(fostered, vec![("x", "x", 7), ("y", "y", 27)]);
}

#[test]
fn test_text_after_body_end_tag() {
    let input = "<body>a\n\n</body>\n tail";
    let output = parse(input).unwrap();
    let (_, body) = element(&output, "body");
    assert_eq!(body.original_end_tag, "</body>");
    let children: Vec<_> = body
        .children
        .iter()
        .filter_map(|&child| match &output.nodes[child].payload {
            RawPayload::Text(text) => Some((text.text.as_str(), text.original_text)),
            _ => None,
        })
        .collect();
    assert_eq!(children, vec![("a\n\n", "a\n\n"), ("\n tail", "\n tail")]);
}

#[test]
fn test_ignored_tag_splits_text() {
    let output = parse("<p>a</x>b</p>").unwrap();
    let originals: Vec<_> = texts(&output).into_iter().map(|(_, text)| text.original_text).collect();
    assert_eq!(originals, vec!["a", "b"]);
}

#[test]
fn test_long_single_line_positions() {
    let input: String = (0..4000).map(|i| format!("<p class=c{i}>t{i}</p>")).collect();
    let output = parse(&input).unwrap();
    let paragraphs = elements(&output, "p");
    assert_eq!(paragraphs.len(), 4000);
    let (_, last) = paragraphs[3999];
    let offset = input.rfind("<p ").unwrap();
    assert_eq!(last.start_pos.line, 1);
    assert_eq!(last.start_pos.offset as usize, offset);
    assert_eq!(last.start_pos.column as usize, offset + 1);
    assert_eq!(last.end_pos.offset as usize, input.len() - "</p>".len());
}

#[test]
fn test_reconstructed_formatting_element() {
    let output = parse("<p><b>x</p>y").unwrap();
    let bold = elements(&output, "b");
    assert_eq!(bold.len(), 2);
    assert_eq!(bold[0].0.parse_flags & codes::flags::RECONSTRUCTED_FORMATTING_ELEMENT, 0);
    assert_ne!(bold[1].0.parse_flags & codes::flags::RECONSTRUCTED_FORMATTING_ELEMENT, 0);
}

#[test]
fn test_adoption_agency_flags() {
    let output = parse("<b>1<p>2</b>3</p>").unwrap();
    let (p_node, _) = element(&output, "p");
    assert_ne!(p_node.parse_flags & codes::flags::ADOPTION_AGENCY_MOVED, 0);

    let bold = elements(&output, "b");
    assert_eq!(bold[0].1.original_tag, "<b>");
    assert_eq!(bold[0].1.original_end_tag, "</b>");
    assert!(
        bold.iter()
            .any(|(node, _)| node.parse_flags & codes::flags::ADOPTION_AGENCY_CLONED != 0)
    );
}

#[test]
fn test_parent_links_match_children() {
    let output = parse("<ul><li>a<li>b</ul><table><td>c</table>").unwrap();
    let document = output.document_node().unwrap();
    let mut stack = vec![output.document];
    let mut seen = 0;
    while let Some(index) = stack.pop() {
        seen += 1;
        for (position, &child) in output.nodes[index].children().iter().enumerate() {
            let node = &output.nodes[child];
            assert_eq!(node.parent, Some(index));
            assert_eq!(node.index_within_parent, position);
            stack.push(child);
        }
    }
    assert_eq!(document.parent, None);
    assert!(seen > 8);
}

#[test]
fn test_empty_input() {
    let output = parse("").unwrap();
    for name in ["html", "head", "body"] {
        let (node, element) = element(&output, name);
        assert_eq!(element.original_tag, "");
        assert_ne!(node.parse_flags & codes::flags::IMPLIED, 0);
    }
}

#[test]
fn test_error_limit() {
    let options = arbor_native::Options {
        max_errors: Some(1),
        ..arbor_native::Options::default()
    };
    let output = arbor_native::parse_with_options(&options, "</a></b></c>").unwrap();
    assert_eq!(output.errors.len(), 1);
}
