use elem_ast::{AttributeValue, MarkupNode};
use elem_parser::{parse, ErrorKind};

fn element<'a>(doc: &'a elem_ast::Document, tag: &str) -> &'a elem_ast::ElementNode {
    doc.roots
        .iter()
        .find_map(|n| match n {
            MarkupNode::Element(e) if e.tag == tag => Some(e),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no root <{tag}> element"))
}

#[test]
fn scenario_one_splits_text_around_expression() {
    let doc = parse("<h1>Hello {name}!</h1>").unwrap();
    let h1 = element(&doc, "h1");
    assert_eq!(h1.children.len(), 3);
    match &h1.children[0] {
        MarkupNode::Text(t) => assert_eq!(t.content, "Hello "),
        other => panic!("expected Text, got {other:?}"),
    }
    match &h1.children[1] {
        MarkupNode::Expression(e) => assert_eq!(e.expr_span.slice("<h1>Hello {name}!</h1>"), "name"),
        other => panic!("expected Expression, got {other:?}"),
    }
    match &h1.children[2] {
        MarkupNode::Text(t) => assert_eq!(t.content, "!"),
        other => panic!("expected Text, got {other:?}"),
    }
}

#[test]
fn leaf_elements_permitted_at_any_depth() {
    // Nesting-depth/multiplicity invariants are the assembler's job, not
    // the parser's (spec §4.4) — the parser must stay permissive.
    let doc = parse("<div><script>let x = 1;</script></div>").unwrap();
    let div = element(&doc, "div");
    assert!(matches!(div.children[0], MarkupNode::LeafElement(_)));
}

#[test]
fn script_leaf_captures_raw_content_through_braces_and_angles() {
    let doc = parse("<script>if (a < b) { c(); }</script>").unwrap();
    match &doc.roots[0] {
        MarkupNode::LeafElement(leaf) => {
            assert_eq!(leaf.tag, "script");
            assert_eq!(leaf.content, "if (a < b) { c(); }");
        }
        other => panic!("expected LeafElement, got {other:?}"),
    }
}

#[test]
fn button_with_directive_attribute_and_expression_child() {
    let doc = parse(r#"<button on:click={() => count += 1}>+</button>"#).unwrap();
    let button = element(&doc, "button");
    assert_eq!(button.attributes.len(), 1);
    let attr = &button.attributes[0];
    assert_eq!(attr.name, "on");
    assert_eq!(attr.directive.as_deref(), Some("click"));
    match &attr.value {
        AttributeValue::Expression(e) => assert_eq!(e.as_str(), "() => count += 1"),
        other => panic!("expected Expression, got {other:?}"),
    }
}

#[test]
fn svg_root_is_not_implemented() {
    let err = parse("<svg></svg>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}

#[test]
fn unterminated_expression_in_text_errors() {
    let err = parse("<p>{oops</p>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedExpression);
}

#[test]
fn mismatched_end_tag_errors() {
    let err = parse("<div><span></div></span>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MismatchedEndTag);
}

#[test]
fn unclosed_attribute_expression_errors() {
    // Scenario 6.
    let err = parse(r#"<a href="{foo">x</a>"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnclosedExpressionInAttribute);
}

#[test]
fn whitespace_only_text_node_round_trips() {
    let doc = parse("<div>  </div>").unwrap();
    let div = element(&doc, "div");
    match &div.children[0] {
        MarkupNode::Text(t) => assert!(t.is_whitespace_only()),
        other => panic!("expected Text, got {other:?}"),
    }
}
