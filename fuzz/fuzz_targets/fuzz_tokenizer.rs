#![no_main]
use std::cell::RefCell;
use std::ops::ControlFlow;

use arbitrary::Unstructured;
use jsonpull::{TokenKind, Tokenizer, TokenizerOptions};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Number, Value};

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Nesting beyond this only produces scalars.
const MAX_NESTING: usize = 8;

// Bytes that change the structure when written over a document.
const STRUCTURAL: &[u8] = b"{}[],:\"\\ 0-.e";

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size == 0 || seed.is_multiple_of(10) {
        RNG.with(|cell| fresh_document(&mut cell.borrow_mut(), data, max_size))
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Writes a flags byte followed by one serialized document, padded with
/// whitespace and sometimes broken by a single structural byte.
fn fresh_document(rng: &mut SmallRng, data: &mut [u8], max_size: usize) -> usize {
    let entropy: Vec<u8> = (0..rng.random_range(16..512)).map(|_| rng.random()).collect();
    let value = arbitrary_value(&mut Unstructured::new(&entropy), 0).unwrap_or(Value::Null);

    let mut document = vec![rng.random::<u8>() & 0x0f];
    pad(rng, &mut document);
    let body = if rng.random_bool(0.5) {
        serde_json::to_vec_pretty(&value)
    } else {
        serde_json::to_vec(&value)
    };
    document.extend(body.expect("a Value always serializes"));
    pad(rng, &mut document);

    if document.len() > 1 && rng.random_ratio(1, 4) {
        let at = rng.random_range(1..document.len());
        document[at] = STRUCTURAL[rng.random_range(0..STRUCTURAL.len())];
    }

    let len = document.len().min(max_size);
    data[..len].copy_from_slice(&document[..len]);
    len
}

/// Appends up to three whitespace bytes; one in sixteen is a vertical tab,
/// which JSON does not treat as whitespace.
fn pad(rng: &mut SmallRng, document: &mut Vec<u8>) {
    for _ in 0..rng.random_range(0..4) {
        let byte = if rng.random_ratio(1, 16) {
            0x0b
        } else {
            b" \t\n\r"[rng.random_range(0..4)]
        };
        document.push(byte);
    }
}

fn arbitrary_value(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Value> {
    let last = if depth >= MAX_NESTING { 5 } else { 7 };
    let value = match u.int_in_range(0..=last)? {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::from(u.arbitrary::<u64>()?),
        3 => Value::from(u.arbitrary::<i64>()?),
        4 => Number::from_f64(u.arbitrary()?).map_or(Value::Null, Value::Number),
        5 => Value::String(u.arbitrary()?),
        6 => {
            let mut items = Vec::new();
            u.arbitrary_loop(None, Some(8), |u| {
                items.push(arbitrary_value(u, depth + 1)?);
                Ok(ControlFlow::Continue(()))
            })?;
            Value::Array(items)
        }
        _ => {
            let mut members = Map::new();
            u.arbitrary_loop(None, Some(8), |u| {
                let key: String = u.arbitrary()?;
                members.insert(key, arbitrary_value(u, depth + 1)?);
                Ok(ControlFlow::Continue(()))
            })?;
            Value::Object(members)
        }
    };
    Ok(value)
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn tokenize(data: &[u8]) {
    let Some((&flags, document)) = data.split_first() else {
        return;
    };
    let options = TokenizerOptions {
        strict_separators: flags & 1 != 0,
        max_depth: (flags & 2 != 0).then_some(64),
        stack_capacity: if flags & 4 != 0 { 0 } else { 512 },
        reject_trailing: flags & 8 != 0,
    };
    let reference_accepts = serde_json::from_slice::<Value>(document).is_ok();

    let mut input = document.to_vec();
    let mut tokenizer = Tokenizer::with_options(&mut input, options);

    let mut depth = 0usize;
    let mut calls = 0usize;
    let terminal = loop {
        calls += 1;
        assert!(calls <= document.len() + 1, "tokenizer did not settle");

        let token = tokenizer.next();
        if let Some(span) = token.span() {
            assert!(span.end() <= document.len());
        }
        match token.kind() {
            TokenKind::Array | TokenKind::Object => depth += 1,
            TokenKind::EndArray | TokenKind::EndObject => {
                depth = depth.checked_sub(1).expect("unbalanced close");
            }
            TokenKind::String => {
                let span = token.span().unwrap();
                assert_eq!(document[span.end()], b'"');
                let copied = tokenizer.string_copied(&token).into_owned();
                assert_eq!(tokenizer.parse_string(token), copied);
            }
            TokenKind::UInt | TokenKind::Int | TokenKind::Float => {
                assert!(tokenizer.parse_float(&token).is_ok());
            }
            TokenKind::Eof | TokenKind::Error => break token,
            TokenKind::Null | TokenKind::Bool => {}
        }
    };

    // Terminal tokens repeat at the same offset.
    let again = tokenizer.next();
    assert_eq!(again.kind(), terminal.kind());
    assert_eq!(again.location(), terminal.location());

    if let Some(eof) = terminal.span() {
        assert_eq!(depth, 0);
        assert_eq!(eof.end(), document.len(), "Eof stops short of the input");
        if options.reject_trailing {
            let rest = &document[eof.range()];
            assert!(rest.iter().all(|b| b" \t\n\r".contains(b)));
        }
    }
    if reference_accepts && options.strict_separators && options.max_depth.is_none() {
        assert_eq!(terminal.kind(), TokenKind::Eof, "rejected a valid document");
    }
}

fuzz_target!(|data: &[u8]| tokenize(data));
