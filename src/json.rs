//! JSON helpers for arbitrarily deep design trees.
//!
//! Derived serde impls recurse once per nesting level. Parsing goes through
//! `serde_stacker` and serialization of nested fields through `stacker`, so
//! the call stack is extended on the heap instead of overflowing.

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::Result;

/// Grow when less than this much stack is left
const RED_ZONE: usize = 64 * 1024;
/// Size of each new stack segment
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Parse JSON text with no nesting limit
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Interpret an already decoded value with no nesting limit
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(T::deserialize(serde_stacker::Deserializer::new(value))?)
}

/// `serialize_with` adapter for fields that hold nested trees
pub fn serialize_nested<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || value.serialize(serializer))
}

/// `serialize_with` adapter for raw JSON values of any depth
pub fn serialize_value<S: Serializer>(value: &Value, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    DeepValue(value).serialize(serializer)
}

/// Serializes a `Value`, checking stack headroom at every array and object
struct DeepValue<'a>(&'a Value);

impl Serialize for DeepValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Array(items) => stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&DeepValue(item))?;
                }
                seq.end()
            }),
            Value::Object(map) => stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, &DeepValue(item))?;
                }
                out.end()
            }),
            scalar => scalar.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize) -> Value {
        let mut v = json!({"leaf": true});
        for _ in 0..depth {
            v = json!({"children": [v]});
        }
        v
    }

    #[test]
    fn deep_text_parses_past_the_default_limit() {
        let depth = 2_000;
        let text = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        assert!(serde_json::from_str::<Value>(&text).is_err());

        let value: Value = from_str(&text).unwrap();
        let mut cur = &value;
        let mut seen = 0;
        while let Value::Array(items) = cur {
            cur = &items[0];
            seen += 1;
        }
        assert_eq!(seen, depth);
        assert_eq!(cur, &json!(1));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(from_str::<Value>("{} x").is_err());
    }

    #[test]
    fn deep_value_serializes_like_serde_json() {
        let shallow = json!({"a": [1, {"b": null}], "c": "d"});
        let mut out = Vec::new();
        serialize_value(&shallow, &mut serde_json::Serializer::new(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), serde_json::to_string(&shallow).unwrap());

        let deep = nested(1_000);
        let mut out = Vec::new();
        serialize_value(&deep, &mut serde_json::Serializer::new(&mut out)).unwrap();
        assert_eq!(out.iter().filter(|b| **b == b'[').count(), 1_000);
    }
}
