//! PHP-style form encoding of nested values.
//!
//! `{"a": 1, "b": {"c": [2, 3]}}` becomes `a=1&b[c][0]=2&b[c][1]=3`.
//!
//! Nested mappings are not descended into as soon as they are seen. Every
//! mapping is scanned with a FIFO work list: scalars and sequences met while
//! scanning are emitted right away, nested mappings are queued and scanned
//! after all their siblings. The resulting order is part of the wire contract
//! (request bodies are compared byte for byte), so the queue is explicit.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::EncodingError;

/// One `key=value` pair of the encoded output. `value` is already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedParam {
    pub key: String,
    pub value: String,
}

impl EncodedParam {
    pub fn new(key: String, raw_value: &str) -> Self {
        // urlencoding leaves exactly [A-Za-z0-9-_.~] untouched; space becomes %20
        Self {
            key,
            value: urlencoding::encode(raw_value).into_owned(),
        }
    }
}

impl fmt::Display for EncodedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Encode a structured value into a `&`-joined form string.
pub fn encode(value: &Value) -> String {
    encode_with_prefix(value, "")
}

/// Encode a structured value with every key nested under `prefix`.
pub fn encode_with_prefix(value: &Value, prefix: &str) -> String {
    collect_params(value, prefix)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialize `params` and encode the result.
///
/// Fails when the value has no structured representation, e.g. a map keyed by
/// something other than strings.
pub fn encode_params<T>(params: &T) -> Result<String, EncodingError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(params)?;
    Ok(encode(&value))
}

/// The individual pairs, in output order. An empty `prefix` means no prefix.
pub fn collect_params(value: &Value, prefix: &str) -> Vec<EncodedParam> {
    let parent = (!prefix.is_empty()).then(|| prefix.to_owned());
    let mut params = Vec::new();
    encode_value(parent, value, &mut params);
    params
}

/// `key` is `None` only at the top level.
fn encode_value(key: Option<String>, value: &Value, params: &mut Vec<EncodedParam>) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let child = compose_key(key.as_deref(), &index.to_string());
                encode_value(Some(child), item, params);
            }
        }
        Value::Object(map) => encode_mapping(key, map, params),
        scalar => params.push(EncodedParam::new(
            key.unwrap_or_default(),
            &scalar_to_string(scalar),
        )),
    }
}

fn encode_mapping(prefix: Option<String>, map: &Map<String, Value>, params: &mut Vec<EncodedParam>) {
    let mut pending: VecDeque<(Option<String>, &Map<String, Value>)> = VecDeque::new();
    pending.push_back((prefix, map));

    while let Some((parent, current)) = pending.pop_front() {
        for (name, child) in current {
            let key = compose_key(parent.as_deref(), name);
            match child {
                Value::Object(nested) => pending.push_back((Some(key), nested)),
                _ => encode_value(Some(key), child, params),
            }
        }
    }
}

/// `outer[inner]`, or the bare inner key at top level. An empty `outer`
/// below the top level still gets brackets: `[inner]`.
fn compose_key(parent: Option<&str>, inner: &str) -> String {
    match parent {
        None => inner.to_owned(),
        Some(parent) => format!("{parent}[{inner}]"),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
