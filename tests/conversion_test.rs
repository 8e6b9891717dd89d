use pagemark::{convert, convert_html, convert_with_settings, Context, Converter, NewlineStyle, Node, Settings, TagKind};

#[test]
fn headings_paragraphs_and_lists() {
    let html = r"
        <h1>Guide</h1>
        <p>Read <em>carefully</em>.</p>
        <ol><li>first</li><li>second</li></ol>
        <ul><li>loose</li></ul>
    ";
    assert_eq!(
        convert_html(html, &Settings::default()),
        "# Guide\n\nRead *carefully*.\n\n1. first\n2. second\n\n- loose"
    );
}

#[test]
fn division_concatenates_children() {
    let body = Node::from_html("<div><span>a</span><span>b</span></div><section>c</section>");
    assert_eq!(convert(&body), "abc");
}

#[test]
fn unknown_tags_keep_their_content() {
    let body = Node::element("body").with_child(
        Node::element("ac:structured-macro").with_child(Node::element("ac:rich-text-body").with_text("inside")),
    );
    assert_eq!(convert(&body), "inside");
}

#[test]
fn special_characters_are_escaped_unless_disabled() {
    let p = Node::element("p").with_text("2 * 3 = [six]");
    assert_eq!(convert(&p), r"2 \* 3 = \[six\]");

    let settings = Settings {
        escape_special_chars: false,
        ..Settings::default()
    };
    assert_eq!(convert_with_settings(&p, &settings), "2 * 3 = [six]");
}

#[test]
fn hard_break_style_is_configurable() {
    let p = Node::from_html("<p>one<br>two</p>");
    assert_eq!(convert(&p), "one  \ntwo");

    let settings = Settings {
        newline_style: NewlineStyle::Backslash,
        ..Settings::default()
    };
    assert_eq!(convert_with_settings(&p, &settings), "one\\\ntwo");
}

#[test]
fn bullet_is_configurable() {
    let settings = Settings {
        bullet: '+',
        ..Settings::default()
    };
    let list = Node::from_html("<ul><li>a</li><li>b</li></ul>");
    assert_eq!(convert_with_settings(&list, &settings), "+ a\n+ b");
}

#[test]
fn conversion_is_deterministic() {
    let html = "<h2>T</h2><table><tr><th>a</th></tr><tr><td><p>x</p><p>y</p></td></tr></table>";
    let settings = Settings::default();
    let first = convert_html(html, &settings);
    for _ in 0..5 {
        assert_eq!(convert_html(html, &settings), first);
    }
}

#[test]
fn converting_a_subtree_only_depends_on_the_given_context() {
    let settings = Settings::default();
    let converter = Converter::new(&settings);
    let paragraph = Node::element("p").with_text("text");

    let top = converter.convert(&paragraph, &Context::root());
    let in_cell = converter.convert(
        &paragraph,
        &Context::root()
            .enter(TagKind::Table)
            .enter(TagKind::TableRow)
            .enter(TagKind::TableDataCell),
    );

    assert_eq!(top, "\n\ntext\n\n");
    assert_eq!(in_cell, "text<br/>");
}

#[test]
fn very_deep_trees_degrade_to_plain_text() {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = Settings {
        max_depth: 8,
        ..Settings::default()
    };
    let mut node = Node::element("p").with_child(Node::element("strong").with_text("bottom"));
    for _ in 0..20 {
        node = Node::element("blockquote").with_child(node);
    }

    let out = convert_with_settings(&node, &settings);
    assert!(out.contains("bottom"));
    assert!(!out.contains("**"));
}

#[test]
fn pathologically_nested_html_converts_without_crashing() {
    let depth = 20_000;
    let html = format!("{}deep<br>text{}", "<div>".repeat(depth), "</div>".repeat(depth));
    assert_eq!(convert_html(&html, &Settings::default()), "deep text");
}
