//! Integration tests for the tagmark parser and render pipeline

use pretty_assertions::assert_eq;
use tagmark::parser::{Literal, Node};
use tagmark::{parse, render, render_with_config, Mode, ParseError, RenderConfig, Target};

#[test]
fn test_parse_mixed_document() {
    let input = r#"
\h1{Release notes}
\p{Fixed \code=={a}=b}== in the \link("/parser")[rel=nofollow]{parser}.}
"#;

    let doc = parse(input).expect("Should parse");
    let tags: Vec<_> = doc
        .body
        .iter()
        .filter_map(|node| match node {
            Node::Tag(tag) => Some(tag.name()),
            Node::Text(_) => None,
        })
        .collect();
    assert_eq!(tags, vec!["h1", "p"]);
}

#[test]
fn test_parse_header_literals() {
    let doc = parse(r#"\x("s", -1.5, 3, true, ident)[a=1, a=2,]"#).expect("Should parse");
    let Node::Tag(tag) = &doc.body[0] else {
        panic!("Expected tag");
    };
    assert_eq!(
        tag.params.iter().map(|p| p.value.clone()).collect::<Vec<_>>(),
        vec![
            Literal::String("s".into()),
            Literal::Number(-1.5),
            Literal::Number(3.0),
            Literal::Bool(true),
            Literal::Ident("ident".into()),
        ]
    );
    assert_eq!(tag.attr_map().get("a"), Some(&serde_json::json!(2)));
}

#[test]
fn test_verbatim_fences_nest_by_width() {
    let doc = parse(r"\code==={a}=b}==c}===").expect("Should parse");
    let Node::Tag(tag) = &doc.body[0] else {
        panic!("Expected tag");
    };
    assert!(tag.blocks[0].verbatim);
    assert_eq!(tag.blocks[0].body, vec![Node::text("a}=b}==c")]);
}

#[test]
fn test_parse_errors_have_spans() {
    let source = "ok\n\\bad(,)";
    let errors = parse(source).expect_err("Should fail");
    assert!(!errors.is_empty());
    for error in &errors {
        assert!(matches!(error, ParseError::Syntax { .. }));
        assert!(error.span().start >= 3);
        assert!(!error.format(source, "doc.tm").is_empty());
    }
}

#[test]
fn test_render_document() {
    let html = render("\\h1{Notes}\n\\p{A \\b{bold} claim.}").expect("Should render");
    assert_eq!(html, "<h1>Notes</h1>\n<p>A <strong>bold</strong> claim.</p>");
}

#[test]
fn test_render_all_paths_agree_on_text() {
    let source = r"\section[id=s]{\h2{Part} \p{One \i{two}}}";

    let dynamic = render(source).expect("Should render");
    let stat = render_with_config(source, &RenderConfig::new().with_mode(Mode::Static)).expect("Should render");
    assert_eq!(dynamic, stat);
    assert_eq!(
        dynamic,
        r#"<section id="s"><h2>Part</h2> <p>One <em>two</em></p></section>"#
    );

    let text = render_with_config(source, &RenderConfig::new().with_target(Target::Text)).expect("Should render");
    assert_eq!(text, "Part One two");
}

#[test]
fn test_verbatim_content_is_not_interpreted() {
    let html = render(r"\code={\b{not bold}}=").expect("Should render");
    assert_eq!(html, r"<code>\b{not bold}</code>");
}
