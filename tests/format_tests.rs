//! Conformance tests for the SCON notation: accepted syntax, typing rules,
//! rejected input and writer output shape.

use variant_tree::{
    read_scon, to_scon_string, Error, IncludeDirs, SconWriterSettings, Variant, VariantTree,
};

fn parse(text: &str) -> VariantTree {
    let mut tree = VariantTree::new();
    if let Err(e) = read_scon(text.as_bytes(), &mut tree, "t.conf", &IncludeDirs::default()) {
        panic!("parse failed: {}\ninput:\n{}", e, text);
    }
    tree
}

fn parse_err(text: &str) -> Error {
    let mut tree = VariantTree::new();
    read_scon(text.as_bytes(), &mut tree, "t.conf", &IncludeDirs::default())
        .expect_err("input should be rejected")
}

// Entries

#[test]
fn test_key_only_entry_is_null() {
    let tree = parse("flag\n");
    assert_eq!(tree.get_value("flag"), Some(&Variant::Null));
}

#[test]
fn test_entries_with_and_without_equals() {
    let a = parse("x = 1\ny = two\n");
    let b = parse("x 1\ny two\n");
    assert_eq!(a, b);
}

#[test]
fn test_indentation_is_insignificant() {
    let a = parse("a {\nb = 1\n}\n");
    let b = parse("      a {\n\t\t b = 1\n   }\n");
    assert_eq!(a, b);
}

#[test]
fn test_crlf_line_endings() {
    let tree = parse("a = 1\r\nb {\r\n  c = 2\r\n}\r\n");
    assert_eq!(tree.get::<i64>("a").unwrap(), 1);
    assert_eq!(tree.get::<i64>("b.c").unwrap(), 2);
}

#[test]
fn test_empty_documents() {
    assert!(parse("").is_empty());
    assert!(parse("\n\n  # only a comment\n").is_empty());
    assert!(parse("a {}").get_child("a").unwrap().is_empty());
}

#[test]
fn test_closing_brace_on_value_line() {
    let tree = parse("a { b = 1 }\nc = 2");
    assert_eq!(tree.get::<i64>("a.b").unwrap(), 1);
    assert_eq!(tree.get::<i64>("c").unwrap(), 2);
}

// Values

#[test]
fn test_scalar_typing() {
    let tree = parse(
        "int = -17\nplus = +5\nfloat = 2.5e3\ndot = .5\nt = true\nf = false\n\
         word = hello\npath = /var/log/app.log\nversion = 1.2.3\nupper = TRUE\n",
    );
    assert_eq!(tree.get_value("int"), Some(&Variant::Int(-17)));
    assert_eq!(tree.get_value("plus"), Some(&Variant::Int(5)));
    assert_eq!(tree.get_value("float"), Some(&Variant::Float(2500.0)));
    assert_eq!(tree.get_value("dot"), Some(&Variant::Float(0.5)));
    assert_eq!(tree.get_value("t"), Some(&Variant::Bool(true)));
    assert_eq!(tree.get_value("f"), Some(&Variant::Bool(false)));
    assert_eq!(tree.get_value("word"), Some(&Variant::from("hello")));
    assert_eq!(tree.get_value("path"), Some(&Variant::from("/var/log/app.log")));
    assert_eq!(tree.get_value("version"), Some(&Variant::from("1.2.3")));
    assert_eq!(tree.get_value("upper"), Some(&Variant::from("TRUE")));
}

#[test]
fn test_quoted_values_are_strings() {
    let tree = parse("a = \"123\"\nb = \"true\"\nc = \"\"\n");
    assert_eq!(tree.get_value("a"), Some(&Variant::from("123")));
    assert_eq!(tree.get_value("b"), Some(&Variant::from("true")));
    assert_eq!(tree.get_value("c"), Some(&Variant::from("")));
}

#[test]
fn test_all_escapes() {
    let tree = parse(r#"s = "\"\'\\\n\r\t\0\a\b\f\v\u00e9""#);
    assert_eq!(
        tree.get_value("s"),
        Some(&Variant::from("\"'\\\n\r\t\0\u{7}\u{8}\u{c}\u{b}\u{e9}"))
    );
}

#[test]
fn test_annotations_on_every_kind() {
    let tree = parse("n = null::null\nb = true::bool\ni = 5::int\nf = 5::float\ns = 5::string\n");
    assert_eq!(tree.get_value("n"), Some(&Variant::Null));
    assert_eq!(tree.get_value("b"), Some(&Variant::Bool(true)));
    assert_eq!(tree.get_value("i"), Some(&Variant::Int(5)));
    assert_eq!(tree.get_value("f"), Some(&Variant::Float(5.0)));
    assert_eq!(tree.get_value("s"), Some(&Variant::from("5")));
}

#[test]
fn test_value_with_block() {
    let tree = parse("db = \"primary\" {\n  port = 5432\n}\n");
    let db = tree.find("db").unwrap();
    assert_eq!(db.data(), &Variant::from("primary"));
    assert_eq!(db.get::<i64>("port").unwrap(), 5432);
}

// Comments

#[test]
fn test_comment_styles() {
    let tree = parse("# hash\n; semi\n// slashes\na = 1 # trailing\nb = 2 ; trailing\nc = 3 // trailing\n");
    let keys: Vec<_> = tree.keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn test_comment_markers_inside_tokens_and_strings() {
    let tree = parse("url = http://host/x#frag\nmsg = \"a # b ; c // d\"\n");
    assert_eq!(tree.get::<String>("url").unwrap(), "http://host/x#frag");
    assert_eq!(tree.get::<String>("msg").unwrap(), "a # b ; c // d");
}

// Rejected input

#[test]
fn test_rejected_inputs() {
    let cases = [
        ("a = \"unterminated\n", "unterminated string"),
        ("a = \"bad \\q escape\"", "invalid escape"),
        ("a = \"\\u12\"", "unicode escape"),
        ("a {\n", "missing '}'"),
        ("}\n", "unbalanced '}'"),
        ("{ a = 1 }", "block without a key"),
        ("= 1", "missing key"),
        ("a = 1 2", "unexpected text after value"),
        ("a =", "missing value"),
        ("a = 1::integer", "unknown type annotation"),
        ("#include nofile", "quoted file name"),
    ];
    for (input, expected) in cases {
        let err = parse_err(input);
        assert!(
            err.to_string().contains(expected),
            "input {:?}: expected {:?} in {:?}",
            input,
            expected,
            err.to_string()
        );
    }
}

#[test]
fn test_conversion_failures() {
    for input in ["a = x::int", "a = 1.5::int", "a = yes::bool", "a = abc::float", "a = 0::null"] {
        assert!(
            matches!(parse_err(input), Error::Conversion { .. }),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_error_display_includes_location_and_line() {
    let err = parse_err("ok = 1\nbad = 1 2\n");
    assert_eq!(
        err.to_string(),
        "t.conf(2): unexpected text after value of \"bad\"\n  bad = 1 2"
    );
}

// Writer shape

#[test]
fn test_writer_forms() {
    let mut tree = VariantTree::new();
    tree.push_back("bare", VariantTree::new());
    tree.add("valued", 1);
    tree.push_back("block", VariantTree::new()).add("x", 1);
    tree.push_back("both", VariantTree::with_data("v")).add("x", 1);

    assert_eq!(
        to_scon_string(&tree, &SconWriterSettings::default()),
        "bare\nvalued = 1\nblock {\n  x = 1\n}\nboth = \"v\" {\n  x = 1\n}\n"
    );
}

#[test]
fn test_writer_ignores_root_datum() {
    let mut tree = VariantTree::with_data("root");
    tree.add("a", 1);
    assert_eq!(to_scon_string(&tree, &SconWriterSettings::default()), "a = 1\n");
}

#[test]
fn test_writer_nested_indentation() {
    let mut tree = VariantTree::new();
    tree.put("a.b.c", 1);
    let settings = SconWriterSettings::new().with_tab_width(3).with_indent_char('.');
    assert_eq!(
        to_scon_string(&tree, &settings),
        "a {\n...b {\n......c = 1\n...}\n}\n"
    );
}
