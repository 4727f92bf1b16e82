use std::cmp::Ordering;

use serde_json::Value;
use strata_types::{CompareOp, StorageQuery};

use crate::compare::compare_values;
use crate::path::resolve_path;

/// Evaluate `query` against a decoded document.
///
/// Total: never panics and never fails. A leaf whose path cannot be
/// resolved, or whose operands have different types, is false for every
/// operator, `ne` included. `And` stops at the first false child and `Or`
/// at the first true one.
pub fn matches(document: &Value, query: &StorageQuery) -> bool {
    match query {
        StorageQuery::Compare { path, op, value } => {
            resolve_path(document, path).is_some_and(|actual| compare_leaf(actual, *op, value))
        }
        StorageQuery::And(queries) => queries.iter().all(|q| matches(document, q)),
        StorageQuery::Or(queries) => queries.iter().any(|q| matches(document, q)),
        StorageQuery::Not(query) => !matches(document, query),
    }
}

fn compare_leaf(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    if is_container(actual) || is_container(expected) {
        // Arrays and objects only support structural (in)equality with a
        // value of the same shape.
        return same_type(actual, expected)
            && match op {
                CompareOp::Eq => actual == expected,
                CompareOp::Ne => actual != expected,
                _ => false,
            };
    }
    compare_values(actual, expected).is_some_and(|ordering| satisfies(op, ordering))
}

fn satisfies(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn same_type(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}
