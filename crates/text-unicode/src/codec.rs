//! JSON wire format: `[5, "ins", {"d": "del"}, {"d": 3}]`.

use serde_json::{json, Value};

use crate::{TextComponent, TextOp, TextOpError};

pub fn component_to_json(comp: &TextComponent) -> Value {
    match comp {
        TextComponent::Retain(n) => json!(n),
        TextComponent::Insert(s) => json!(s),
        TextComponent::Delete(n) => json!({ "d": n }),
        TextComponent::DeleteStr(s) => json!({ "d": s }),
    }
}

pub fn component_from_json(v: &Value) -> Result<TextComponent, TextOpError> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .map(|n| TextComponent::Retain(n as usize))
            .ok_or_else(|| TextOpError::InvalidComponent(format!("bad retain {n}"))),
        Value::String(s) => Ok(TextComponent::Insert(s.clone())),
        Value::Object(map) => match map.get("d") {
            Some(Value::String(s)) => Ok(TextComponent::DeleteStr(s.clone())),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|n| TextComponent::Delete(n as usize))
                .ok_or_else(|| TextOpError::InvalidComponent(format!("bad delete {n}"))),
            _ => Err(TextOpError::InvalidComponent(v.to_string())),
        },
        _ => Err(TextOpError::InvalidComponent(v.to_string())),
    }
}

pub fn to_json(op: &TextOp) -> Value {
    Value::Array(op.iter().map(component_to_json).collect())
}

pub fn from_json(v: &Value) -> Result<TextOp, TextOpError> {
    v.as_array()
        .ok_or(TextOpError::NotAnArray)?
        .iter()
        .map(component_from_json)
        .collect()
}
