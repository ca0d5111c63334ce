use rstest::rstest;

use super::parse_document;

#[rstest]
#[case::null("null")]
#[case::bools("[true, false]")]
#[case::integers("[0, 1, -1, 9007199254740993, -9223372036854775808, 18446744073709551615]")]
#[case::floats("[0.5, -0.0, 1e-7, 2.5E+3, 1.7976931348623157e308]")]
#[case::empty_containers(r#"{"a": [], "b": {}, "c": [{}]}"#)]
#[case::escapes(r#"["\"\\\/\b\f\n\r\t", "caf\u00e9", "\u20ac\u0000"]"#)]
#[case::raw_utf8(r#"{"grüße": "日本語 😀"}"#)]
#[case::whitespace(" \r\n\t{ \"a\" :\r\n [ 1 ,\t2 ] } \n")]
#[case::nested(r#"[[[[[[[[[[{"deep": [[[[[1]]]]]}]]]]]]]]]]"#)]
#[case::several_members(r#"{"a": 1, "b": 2}"#)]
fn matches_serde_json(#[case] input: &str) {
    let expected: serde_json::Value = serde_json::from_str(input).unwrap();
    let mut bytes = input.as_bytes().to_vec();
    assert_eq!(parse_document(&mut bytes), expected);
}

#[rstest]
#[case::leading_comma("[,1, 2]", "[1, 2]")]
#[case::missing_commas("[1 2 3]", "[1, 2, 3]")]
#[case::missing_member_comma(r#"{"a": 1 "b": [true false]}"#, r#"{"a": 1, "b": [true, false]}"#)]
fn lenient_separators_match_canonical_form(#[case] lenient: &str, #[case] canonical: &str) {
    let expected: serde_json::Value = serde_json::from_str(canonical).unwrap();
    let mut bytes = lenient.as_bytes().to_vec();
    assert_eq!(parse_document(&mut bytes), expected);
}
