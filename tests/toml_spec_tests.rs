//! Grammar edge cases: string forms, numeric shapes, date-time details,
//! key spellings, and the statement-level rules around headers.

use tomldoc::{parse, DateTimeForm, Error, TomlValue};

fn value(input: &str) -> TomlValue {
    let doc = parse(&format!("v = {input}")).unwrap();
    doc.get("v").cloned().unwrap()
}

fn value_err(input: &str) -> Error {
    parse(&format!("v = {input}")).unwrap_err()
}

mod strings {
    use super::*;

    #[test]
    fn basic_escapes() {
        assert_eq!(
            value(r#""tab\there \u00E9 \U0001F600""#),
            TomlValue::String("tab\there é \u{1F600}".to_string())
        );
    }

    #[test]
    fn literal_strings_keep_backslashes() {
        assert_eq!(
            value(r"'C:\net\share'"),
            TomlValue::String(r"C:\net\share".to_string())
        );
    }

    #[test]
    fn multiline_basic() {
        let doc = parse("v = \"\"\"\nRoses are red\nViolets are blue\"\"\"").unwrap();
        assert_eq!(
            doc.get_str("v"),
            Some("Roses are red\nViolets are blue")
        );
    }

    #[test]
    fn multiline_literal() {
        let doc = parse("v = '''\nno \\escapes\nhere'''").unwrap();
        assert_eq!(doc.get_str("v"), Some("no \\escapes\nhere"));
    }

    #[test]
    fn line_ending_backslash_joins_lines() {
        let doc = parse("v = \"\"\"one \\\n   two \\\n   three\"\"\"").unwrap();
        assert_eq!(doc.get_str("v"), Some("one two three"));
    }

    #[test]
    fn single_line_strings_reject_newlines() {
        assert!(matches!(value_err("\"a\nb\""), Error::Lexical { .. }));
        assert!(matches!(value_err("'a\nb'"), Error::Lexical { .. }));
    }

    #[test]
    fn invalid_escapes_rejected() {
        assert!(matches!(value_err(r#""\x41""#), Error::Lexical { .. }));
        assert!(matches!(value_err(r#""\uD800""#), Error::Lexical { .. }));
    }

    #[test]
    fn unterminated_strings_rejected() {
        assert!(matches!(value_err("\"open"), Error::Lexical { .. }));
        assert!(matches!(value_err("'''open"), Error::Lexical { .. }));
    }
}

mod numbers {
    use super::*;

    #[test]
    fn integer_spellings() {
        assert_eq!(value("0"), TomlValue::Integer(0));
        assert_eq!(value("+0"), TomlValue::Integer(0));
        assert_eq!(value("-0"), TomlValue::Integer(0));
        assert_eq!(value("9_223_372_036_854_775_807"), TomlValue::Integer(i64::MAX));
        assert_eq!(
            value("-9_223_372_036_854_775_808"),
            TomlValue::Integer(i64::MIN)
        );
        assert_eq!(value("0xdead_beef"), TomlValue::Integer(0xdead_beef));
        assert_eq!(value("0o0"), TomlValue::Integer(0));
        assert_eq!(value("0b11"), TomlValue::Integer(3));
    }

    #[test]
    fn integer_overflow_rejected() {
        assert!(matches!(
            value_err("9_223_372_036_854_775_808"),
            Error::Lexical { .. }
        ));
    }

    #[test]
    fn signed_radix_rejected() {
        assert!(matches!(value_err("-0x1"), Error::Lexical { .. }));
        assert!(matches!(value_err("+0b1"), Error::Lexical { .. }));
    }

    #[test]
    fn float_spellings() {
        assert_eq!(value("1.0"), TomlValue::Float(1.0));
        assert_eq!(value("3.141_5"), TomlValue::Float(3.1415));
        assert_eq!(value("5e+22"), TomlValue::Float(5e22));
        assert_eq!(value("-0.0"), TomlValue::Float(-0.0));
        assert_eq!(value("+1.5"), TomlValue::Float(1.5));
    }

    #[test]
    fn float_shape_errors() {
        assert!(matches!(value_err(".7"), Error::Lexical { .. }));
        assert!(matches!(value_err("7."), Error::Lexical { .. }));
        assert!(matches!(value_err("3.e+20"), Error::Lexical { .. }));
    }

    #[test]
    fn leading_zeros_rejected() {
        assert!(matches!(value_err("042"), Error::Lexical { .. }));
        assert!(matches!(value_err("0_1"), Error::Lexical { .. }));
    }
}

mod datetimes {
    use super::*;

    fn datetime(input: &str) -> tomldoc::TomlDateTime {
        match value(input) {
            TomlValue::DateTime(dt) => dt,
            other => panic!("expected date-time, got {other:?}"),
        }
    }

    #[test]
    fn all_four_forms() {
        assert_eq!(
            datetime("1979-05-27T07:32:00Z").form(),
            DateTimeForm::OffsetDateTime
        );
        assert_eq!(
            datetime("1979-05-27T07:32:00").form(),
            DateTimeForm::LocalDateTime
        );
        assert_eq!(datetime("1979-05-27").form(), DateTimeForm::LocalDate);
        assert_eq!(datetime("07:32:00").form(), DateTimeForm::LocalTime);
    }

    #[test]
    fn space_separator_accepted() {
        assert_eq!(
            datetime("1979-05-27 07:32:00"),
            datetime("1979-05-27T07:32:00")
        );
    }

    #[test]
    fn fractional_seconds() {
        let dt = datetime("07:32:00.999");
        assert_eq!(dt.time().unwrap().nanosecond, 999_000_000);
        // Digits beyond nanosecond precision are truncated, not rejected.
        let dt = datetime("07:32:00.1234567899");
        assert_eq!(dt.time().unwrap().nanosecond, 123_456_789);
    }

    #[test]
    fn explicit_offsets() {
        assert_eq!(
            datetime("1979-05-27T00:32:00-07:00").offset_minutes(),
            Some(-420)
        );
        assert_eq!(
            datetime("1979-05-27T00:32:00+05:30").offset_minutes(),
            Some(330)
        );
        assert_eq!(datetime("1979-05-27T00:32:00Z").offset_minutes(), Some(0));
    }

    #[test]
    fn rendering_is_reparsable() {
        for text in [
            "1979-05-27T07:32:00Z",
            "1979-05-27T07:32:00.5-03:30",
            "1979-05-27T07:32:00",
            "1979-05-27",
            "07:32:00",
        ] {
            let dt = datetime(text);
            assert_eq!(datetime(&dt.to_string()), dt);
        }
    }

    #[test]
    fn impossible_dates_rejected() {
        assert!(matches!(value_err("2024-13-01"), Error::Lexical { .. }));
        assert!(matches!(value_err("2024-02-30"), Error::Lexical { .. }));
        assert!(matches!(value_err("24:00:00"), Error::Lexical { .. }));
        assert!(matches!(value_err("07:60:00"), Error::Lexical { .. }));
    }

    #[test]
    fn ordering_within_a_form() {
        assert!(datetime("1979-05-27") < datetime("1979-05-28"));
        assert!(datetime("07:32:00") < datetime("07:32:01"));
        // Cross-form comparison is undefined.
        assert_eq!(
            datetime("1979-05-27").partial_cmp(&datetime("07:32:00")),
            None
        );
    }
}

mod keys {
    use super::*;

    #[test]
    fn quoted_key_segments_in_dotted_paths() {
        let doc = parse("site.\"google.com\" = true").unwrap();
        let site = doc.get_table("site").unwrap();
        assert_eq!(site.get_bool("google.com"), Some(true));
    }

    #[test]
    fn quoted_keys_in_headers() {
        let doc = parse("[dog.\"tater.man\"]\ntype = \"pug\"").unwrap();
        let inner = doc
            .get_table("dog")
            .and_then(|d| d.get_table("tater.man"))
            .unwrap();
        assert_eq!(inner.get_str("type"), Some("pug"));
    }

    #[test]
    fn whitespace_around_dots_ignored() {
        let doc = parse("a . b = 1").unwrap();
        assert_eq!(doc.get_table("a").unwrap().get_integer("b"), Some(1));
    }

    #[test]
    fn numeric_looking_bare_keys() {
        let doc = parse("1234 = \"value\"").unwrap();
        assert_eq!(doc.get_str("1234"), Some("value"));
    }
}

mod statements {
    use super::*;

    #[test]
    fn crlf_documents() {
        let doc = parse("a = 1\r\nb = 2\r\n").unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn bare_carriage_return_rejected() {
        assert!(matches!(
            parse("a = 1\rb = 2").unwrap_err(),
            Error::Lexical { .. }
        ));
    }

    #[test]
    fn header_must_end_its_line() {
        assert!(matches!(
            parse("[a] b = 1").unwrap_err(),
            Error::Syntax { .. }
        ));
    }

    #[test]
    fn empty_header_rejected() {
        assert!(parse("[]").is_err());
        assert!(parse("[[]]").is_err());
    }

    #[test]
    fn headers_descend_through_arrays_of_tables_only() {
        // A header under [[a]] lands in the most recent element.
        assert!(parse("[[a]]\n[b]\nc = 1\n[a.x]").is_ok());
        // A plain header cannot descend through a static array.
        assert!(matches!(
            parse("a = [{ x = 1 }]\n[a.b]").unwrap_err(),
            Error::Semantic { .. }
        ));
    }

    #[test]
    fn value_in_key_position_rejected() {
        assert!(parse("= 1").is_err());
        assert!(parse("[= 1]").is_err());
    }

    #[test]
    fn deeply_nested_inline_values() {
        let doc = parse("v = [[[1], [2]], { a = [3] }]").unwrap();
        let outer = doc.get_array("v").unwrap();
        assert_eq!(outer.len(), 2);
        let nested = outer[0].as_array().unwrap();
        assert_eq!(nested[1].as_array().unwrap()[0], TomlValue::Integer(2));
        let inline = outer[1].as_table().unwrap();
        assert_eq!(inline.get_array("a").unwrap()[0], TomlValue::Integer(3));
    }

    #[test]
    fn comments_after_values_and_headers() {
        let doc = parse("a = 1 # trailing\n[t] # header comment\nb = 2").unwrap();
        assert_eq!(doc.get_integer("a"), Some(1));
        assert_eq!(doc.get_table("t").unwrap().get_integer("b"), Some(2));
    }

    #[test]
    fn empty_and_blank_documents() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n# only comments\n\n").unwrap().is_empty());
    }
}
