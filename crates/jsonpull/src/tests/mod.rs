mod arbitrary;
mod parse_good;

use alloc::{borrow::ToOwned, vec::Vec};

use serde_json::{Map, Value};

use crate::{Token, TokenKind, Tokenizer};

/// Rebuilds the value starting at `token` from the rest of the stream.
///
/// Integer kinds map to integer numbers and `Float` to float numbers, the way
/// `serde_json` classifies them, so a faithful token stream compares equal.
pub(crate) fn to_value(tokenizer: &mut Tokenizer<'_>, token: Token) -> Value {
    match token.kind() {
        TokenKind::Null => Value::Null,
        TokenKind::Bool => Value::Bool(tokenizer.parse_bool(&token)),
        TokenKind::UInt => Value::from(tokenizer.parse_uint(&token).unwrap()),
        TokenKind::Int => Value::from(tokenizer.parse_int(&token).unwrap()),
        TokenKind::Float => Value::from(tokenizer.parse_float(&token).unwrap()),
        TokenKind::String => Value::String(tokenizer.parse_str(token).unwrap().to_owned()),
        TokenKind::Array => {
            let mut items = Vec::new();
            while let Some(item) = tokenizer.next_item().unwrap() {
                items.push(to_value(tokenizer, item));
            }
            Value::Array(items)
        }
        TokenKind::Object => {
            let mut map = Map::new();
            while let Some(key) = tokenizer.next_item().unwrap() {
                let key = tokenizer.parse_str(key).unwrap().to_owned();
                let value = tokenizer.next();
                map.insert(key, to_value(tokenizer, value));
            }
            Value::Object(map)
        }
        kind => panic!("{kind} token where a value was expected"),
    }
}

/// Tokenizes a whole document into a value, checking that it ends in `Eof`.
pub(crate) fn parse_document(input: &mut [u8]) -> Value {
    let mut tokenizer = Tokenizer::new(input);
    let root = tokenizer.next();
    let value = to_value(&mut tokenizer, root);
    assert_eq!(tokenizer.next().kind(), TokenKind::Eof);
    value
}

pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}
