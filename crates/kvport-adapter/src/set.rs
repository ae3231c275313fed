//! Set-as-list semantics over JSON arrays.
//!
//! A "set" is an ordinary JSON array that never holds two elements with the
//! same canonical encoding. Membership is decided on encoded text, never on
//! identity or loose equality, so `{"b":1,"a":2}` and `{"a":2,"b":1}` are the
//! same element while `1` and `"1"` are not.

use serde_json::Value;

use crate::error::{AdapterError, AdapterResult};

/// Encode `value` as compact JSON with object keys in sorted order.
///
/// This is the single encoder used for stored entries and for every
/// membership comparison. The output does not depend on the insertion order
/// of object keys, nor on whether `serde_json` was built with
/// `preserve_order`.
pub fn canonical_json(value: &Value) -> AdapterResult<String> {
    let mut out = String::new();
    write_canonical(value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> AdapterResult<()> {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, field)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&encode_scalar(&Value::String(key.clone()))?);
                out.push(':');
                write_canonical(field, out)?;
            }
            out.push('}');
        }
        scalar => out.push_str(&encode_scalar(scalar)?),
    }
    Ok(())
}

fn encode_scalar(value: &Value) -> AdapterResult<String> {
    serde_json::to_string(value).map_err(|e| AdapterError::Encode(e.to_string()))
}

/// Returns `true` if some element of `list` encodes identically to `value`.
pub fn contains(list: &[Value], value: &Value) -> AdapterResult<bool> {
    let needle = canonical_json(value)?;
    for item in list {
        if canonical_json(item)? == needle {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Append `value` unless an equal element is already present.
///
/// Returns `true` if the list grew.
pub fn push_unique(list: &mut Vec<Value>, value: Value) -> AdapterResult<bool> {
    if contains(list, &value)? {
        return Ok(false);
    }
    list.push(value);
    Ok(true)
}

/// Drop every element that encodes identically to `value`, keeping the
/// relative order of the rest.
///
/// Returns the number of elements removed.
pub fn remove_all(list: &mut Vec<Value>, value: &Value) -> AdapterResult<usize> {
    let needle = canonical_json(value)?;
    let before = list.len();
    let mut kept = Vec::with_capacity(before);
    for item in list.drain(..) {
        if canonical_json(&item)? != needle {
            kept.push(item);
        }
    }
    *list = kept;
    Ok(before - list.len())
}
