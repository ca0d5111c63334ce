#![expect(missing_docs)]
#![expect(clippy::needless_raw_string_hashes)]

use core::fmt::Write;

use jsonpull::{TokenKind, Tokenizer, TokenizerOptions};

fn render_with(input: &str, options: TokenizerOptions) -> String {
    let mut bytes = input.as_bytes().to_vec();
    let mut tokenizer = Tokenizer::with_options(&mut bytes, options);
    let mut out = String::new();
    loop {
        let token = tokenizer.next();
        let kind = token.kind();
        let line = match token.syntax_error() {
            Some(error) => format!("{kind}@{}: {}", error.offset, error.message),
            None => format!("{kind}@{}: {}", token.location(), tokenizer.text(&token)),
        };
        writeln!(out, "{}", line.trim_end()).unwrap();
        if matches!(kind, TokenKind::Eof | TokenKind::Error) {
            return out;
        }
    }
}

fn render(input: &str) -> String {
    render_with(input, TokenizerOptions::default())
}

#[test]
fn snapshot_nested_document() {
    insta::assert_snapshot!(render(r#"{"a": [1, -2.5e3, true], "b": null}"#), @r#"
    object@0: {
    string@2: a
    array@6: [
    uint@7: 1
    float@10: -2.5e3
    bool@18: true
    end of array@22: ]
    string@26: b
    null@30: null
    end of object@34: }
    end of input@35:
    "#);
}

#[test]
fn snapshot_raw_string_text() {
    insta::assert_snapshot!(render(r#"["a\"b", ""]"#), @r#"
    array@0: [
    string@2: a\"b
    string@10:
    end of array@11: ]
    end of input@12:
    "#);
}

#[test]
fn snapshot_error_latches() {
    insta::assert_snapshot!(render(r#"[1, {"k": tru}]"#), @r#"
    array@0: [
    uint@1: 1
    object@4: {
    string@6: k
    error@10: Expected string, array, object, null, boolean or number
    "#);
}

#[test]
fn snapshot_strict_separators() {
    let strict = TokenizerOptions {
        strict_separators: true,
        ..Default::default()
    };
    insta::assert_snapshot!(render(r#"{"a": 1 "b": 2}"#), @r#"
    object@0: {
    string@2: a
    uint@6: 1
    string@9: b
    uint@13: 2
    end of object@14: }
    end of input@15:
    "#);
    insta::assert_snapshot!(render_with(r#"{"a": 1 "b": 2}"#, strict), @r#"
    object@0: {
    string@2: a
    uint@6: 1
    error@8: Expected ',' or '}'
    "#);
}
