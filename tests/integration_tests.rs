//! End-to-end tests over the public API: parsing, the document model,
//! canonical serialization, and the serde bridge.

use tomldoc::{
    parse, parse_with_options, to_string, to_string_value, to_value, toml, DateTimeForm, Error,
    ParseOptions, TomlDateTime, TomlTable, TomlValue,
};

#[test]
fn parse_a_realistic_document() {
    let doc = parse(
        r#"
# Example configuration
title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00-08:00

[database]
server = "192.168.1.1"
ports = [8001, 8001, 8002]
connection_max = 5000
enabled = true

[servers.alpha]
ip = "10.0.0.1"

[servers.beta]
ip = "10.0.0.2"

[[products]]
name = "Hammer"
sku = 738594937

[[products]]
name = "Nail"
sku = 284758393
color = "gray"
"#,
    )
    .unwrap();

    assert_eq!(doc.get_str("title"), Some("TOML Example"));

    let owner = doc.get_table("owner").unwrap();
    let dob = owner.get_datetime("dob").unwrap();
    assert_eq!(dob.form(), DateTimeForm::OffsetDateTime);
    assert_eq!(dob.offset_minutes(), Some(-480));

    let database = doc.get_table("database").unwrap();
    assert_eq!(database.get_array("ports").unwrap().len(), 3);
    assert_eq!(database.get_integer("connection_max"), Some(5000));
    assert_eq!(database.get_bool("enabled"), Some(true));

    let servers = doc.get_table("servers").unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(
        servers.get_table("alpha").unwrap().get_str("ip"),
        Some("10.0.0.1")
    );

    let products = doc.get_array("products").unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(
        products[1].as_table().unwrap().get_str("color"),
        Some("gray")
    );
}

#[test]
fn round_trip_preserves_the_tree() {
    let input = r#"
title = "demo"
count = 3
ratio = 0.25
flag = false
when = 2024-01-02T03:04:05Z
tags = ["a", "b"]
inline = { x = 1, y = 2 }

[section]
nested = "yes"

[[items]]
id = 1

[[items]]
id = 2
"#;
    let doc = parse(input).unwrap();
    let text = to_string(&doc);
    let again = parse(&text).unwrap();
    assert_eq!(doc, again);
}

#[test]
fn round_trip_of_a_programmatic_document() {
    let mut doc = TomlTable::new();
    doc.insert("name", TomlValue::from("widget"));
    doc.insert("weight", TomlValue::from(1.5));
    doc.insert(
        "sizes",
        TomlValue::from(vec![TomlValue::from(1i64), TomlValue::from(2i64)]),
    );
    let mut meta = TomlTable::new();
    meta.insert("key with space", TomlValue::from("quoted"));
    doc.insert("meta", TomlValue::Table(meta));
    doc.insert("empty", TomlValue::Table(TomlTable::new()));

    let again = parse(&to_string(&doc)).unwrap();
    assert_eq!(doc, again);
}

#[test]
fn duplicate_key_is_a_semantic_error() {
    match parse("a = 1\na = 2").unwrap_err() {
        Error::Semantic { line, path, .. } => {
            assert_eq!(line, 2);
            assert_eq!(path, "a");
        }
        other => panic!("expected semantic error, got {other:?}"),
    }
}

#[test]
fn reopened_table_is_a_semantic_error() {
    assert!(matches!(
        parse("[t]\na = 1\n[t]\nb = 2").unwrap_err(),
        Error::Semantic { .. }
    ));
}

#[test]
fn dotted_key_creates_nested_tables() {
    let doc = parse("a.b.c = 1").unwrap();
    let value = doc
        .get_table("a")
        .and_then(|a| a.get_table("b"))
        .and_then(|b| b.get("c"));
    assert_eq!(value, Some(&TomlValue::Integer(1)));
}

#[test]
fn array_of_tables_in_order() {
    let doc = parse("[[arr]]\nx = 1\n[[arr]]\nx = 2").unwrap();
    let arr = doc.get_array("arr").unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0].as_table().unwrap().get_integer("x"), Some(1));
    assert_eq!(arr[1].as_table().unwrap().get_integer("x"), Some(2));
}

#[test]
fn numeric_disambiguation() {
    let doc = parse("n = 1_000").unwrap();
    assert_eq!(doc.get_integer("n"), Some(1000));

    let doc = parse("n = 1_000.5").unwrap();
    assert_eq!(doc.get_float("n"), Some(1000.5));

    let doc = parse("n = 0x1A").unwrap();
    assert_eq!(doc.get_integer("n"), Some(26));

    let doc = parse("n = 1_0_0").unwrap();
    assert_eq!(doc.get_integer("n"), Some(100));

    assert!(matches!(
        parse("n = _100").unwrap_err(),
        Error::Lexical { .. }
    ));
    assert!(matches!(
        parse("n = 100_").unwrap_err(),
        Error::Lexical { .. }
    ));
}

#[test]
fn datetime_forms_do_not_cross_compare() {
    let date_only = parse("d = 2024-01-02").unwrap();
    let with_offset = parse("d = 2024-01-02T03:04:05Z").unwrap();

    let a = date_only.get_datetime("d").unwrap();
    let b = with_offset.get_datetime("d").unwrap();
    assert_eq!(a.form(), DateTimeForm::LocalDate);
    assert_eq!(b.form(), DateTimeForm::OffsetDateTime);
    assert_ne!(a, b);
}

#[test]
fn offset_datetimes_compare_by_instant() {
    let utc = parse("d = 2024-01-02T03:04:05Z").unwrap();
    let shifted = parse("d = 2024-01-02T04:04:05+01:00").unwrap();
    assert_eq!(
        utc.get_datetime("d").unwrap(),
        shifted.get_datetime("d").unwrap()
    );
}

#[test]
fn inline_table_closes_after_its_statement() {
    let doc = parse("t = { a = 1, b = 2 }").unwrap();
    let t = doc.get_table("t").unwrap();
    assert_eq!(t.get_integer("a"), Some(1));
    assert_eq!(t.get_integer("b"), Some(2));

    assert!(matches!(
        parse("t = { a = 1 }\n[t]\nc = 3").unwrap_err(),
        Error::Semantic { .. }
    ));
    assert!(matches!(
        parse("t = { a = 1 }\nt.c = 3").unwrap_err(),
        Error::Semantic { .. }
    ));
}

#[test]
fn table_order_follows_first_appearance() {
    let doc = parse("b = 1\na = 2\n[z]\n[m]").unwrap();
    let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["b", "a", "z", "m"]);
}

#[test]
fn strict_arrays_option() {
    let strict = ParseOptions::new().with_strict_arrays(true);
    assert!(parse_with_options("a = [1, 2, 3]", strict).is_ok());
    assert!(matches!(
        parse_with_options("a = [1, \"x\"]", strict).unwrap_err(),
        Error::Semantic { .. }
    ));
    // Arrays of same-kind containers pass.
    assert!(parse_with_options("a = [[1], [2, 3]]", strict).is_ok());
}

#[test]
fn first_error_wins() {
    // The duplicate on line 2 is reported even though line 3 is also bad.
    let err = parse("a = 1\na = 2\nb = ???").unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn io_entry_points() {
    let bytes = b"a = 1\n";
    let doc = tomldoc::from_slice(bytes).unwrap();
    assert_eq!(doc.get_integer("a"), Some(1));

    let doc = tomldoc::from_reader(std::io::Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(doc.get_integer("a"), Some(1));

    let mut out = Vec::new();
    tomldoc::to_writer(&mut out, &doc).unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn serde_bridge_into_the_document_model() {
    #[derive(serde::Serialize)]
    struct Server {
        host: String,
        port: u16,
        tags: Vec<String>,
    }

    let value = to_value(&Server {
        host: "localhost".into(),
        port: 8080,
        tags: vec!["web".into()],
    })
    .unwrap();

    let mut doc = TomlTable::new();
    doc.insert("server", value);
    let text = to_string(&doc);
    let parsed = parse(&text).unwrap();
    assert_eq!(
        parsed.get_table("server").unwrap().get_integer("port"),
        Some(8080)
    );
}

#[test]
fn macro_built_values_serialize() {
    let value = toml!({
        "name": "demo",
        "limits": { "cpu": 2, "mem": 512 },
        "tags": ["a", "b"],
    });
    assert_eq!(
        to_string_value(&value),
        "{ name = \"demo\", limits = { cpu = 2, mem = 512 }, tags = [\"a\", \"b\"] }"
    );
}

#[test]
fn display_matches_inline_serialization() {
    let value = toml!([1, 2, 3]);
    assert_eq!(value.to_string(), to_string_value(&value));
}

#[test]
fn datetime_constructors_agree_with_parsing() {
    let built = TomlDateTime::offset_datetime(2024, 1, 2, 3, 4, 5, 0, 0).unwrap();
    let parsed = parse("d = 2024-01-02T03:04:05Z").unwrap();
    assert_eq!(parsed.get_datetime("d"), Some(&built));
}

#[test]
fn errors_display_their_position() {
    let err = parse("a = ???").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("line 1"), "missing position in: {text}");
}
