use std::cmp::Ordering;

use serde_json::Value;
use strata_types::OrderDirection;

use crate::compare::compare_numbers;
use crate::path::resolve_path;

/// Orders documents by the value found at a dotted field path.
///
/// The ordering is total so that it is safe to hand to `slice::sort_by`:
/// values are first ranked by type (missing < null < bool < number <
/// string < array < object) and then compared within their type. Arrays
/// and objects all tie with each other. Ties compare `Equal` in both
/// directions, so a stable sort keeps them in their original order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    field: String,
    direction: OrderDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }

    /// Compare two documents by this order's field and direction.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = total_cmp(resolve_path(a, &self.field), resolve_path(b, &self.field));
        if self.direction.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Comparator over documents for `field` in `direction`.
pub fn sort_by(field: &str, direction: OrderDirection) -> impl Fn(&Value, &Value) -> Ordering {
    let order = SortOrder::new(field, direction);
    move |a: &Value, b: &Value| order.compare(a, b)
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn total_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
