use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

/// A random JSON document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Doc(pub Value);

fn number(g: &mut Gen) -> Number {
    match u8::arbitrary(g) % 3 {
        0 => Number::from(u64::arbitrary(g)),
        1 => Number::from(i64::arbitrary(g)),
        _ => {
            let mut value = f64::arbitrary(g);
            while !value.is_finite() {
                value = f64::arbitrary(g);
            }
            // Finite by construction.
            Number::from_f64(value).unwrap_or_else(|| Number::from(0))
        }
    }
}

fn scalar(g: &mut Gen) -> Value {
    match u8::arbitrary(g) % 4 {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Number(number(g)),
        _ => Value::String(String::arbitrary(g)),
    }
}

fn value(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return scalar(g);
    }
    match u8::arbitrary(g) % 6 {
        0..=3 => scalar(g),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| value(g, depth - 1)).collect::<Vec<_>>())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Self(value(g, depth))
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        let children: Vec<Value> = match &self.0 {
            Value::Array(items) => items.clone(),
            Value::Object(map) => map.values().cloned().collect(),
            _ => Vec::new(),
        };
        alloc::boxed::Box::new(children.into_iter().map(Doc))
    }
}
