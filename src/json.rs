//! `serde_json::Value` as a comparable node. Arrays are sequences of `Value`;
//! the other variants are scalars, and objects have no sequence capability.

use serde_json::{Number, Value};
use std::any::Any;

use crate::node::{Node, SequenceOf};
use crate::types::{SequenceCapability, TypeCategory, TypeInfo};

impl SequenceOf<Value> for Value {
    fn items(&self) -> Vec<&Value> {
        self.as_array()
            .map(|items| items.iter().collect())
            .unwrap_or_default()
    }
}

impl Node for Value {
    fn runtime_type(&self) -> TypeInfo {
        match self {
            Value::Null => TypeInfo::of::<Value>(TypeCategory::Null).named("null"),
            Value::Bool(_) => TypeInfo::of::<Value>(TypeCategory::Boolean).named("bool"),
            Value::Number(n) if n.is_f64() => {
                TypeInfo::of::<Value>(TypeCategory::Float).named("number")
            }
            Value::Number(_) => TypeInfo::of::<Value>(TypeCategory::Integer).named("number"),
            Value::String(_) => TypeInfo::of::<Value>(TypeCategory::Text).named("string"),
            Value::Array(_) => TypeInfo::object::<Value>()
                .named("array")
                .with_capability(SequenceCapability::of::<Value, Value>())
                .with_untyped_elements(),
            Value::Object(_) => TypeInfo::object::<Value>().named("object"),
        }
    }

    fn static_type() -> TypeInfo {
        TypeInfo::erased("Value")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, other: &dyn Node) -> bool {
        other
            .as_any()
            .downcast_ref::<Value>()
            .map_or(false, |other| json_equals(self, other))
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn elements(&self) -> Option<Vec<&dyn Node>> {
        self.as_array()
            .map(|items| items.iter().map(|item| item as &dyn Node).collect())
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Deep equality where numbers compare by value, so `1` equals `1.0`.
pub fn json_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => numbers_equal(na, nb),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).map_or(false, |y| json_equals(x, y)))
        }
        _ => a == b,
    }
}

fn numbers_equal(na: &Number, nb: &Number) -> bool {
    if na.is_f64() || nb.is_f64() {
        if let (Some(da), Some(db)) = (na.as_f64(), nb.as_f64()) {
            return (da - db).abs() < f64::EPSILON;
        }
    }
    na == nb
}
