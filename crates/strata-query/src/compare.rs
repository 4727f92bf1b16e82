use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Order two JSON scalars by their natural type.
///
/// - numbers compare numerically and exactly, integers included
/// - strings compare lexicographically, which orders ISO-8601 timestamps
///   chronologically
/// - booleans order `false < true`; `null` equals `null`
///
/// Returns `None` for values of different types and for arrays or objects,
/// which have no ordering.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(compare_numbers(a, b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Exact total order on JSON numbers.
///
/// Integer pairs never go through `f64`, and an integer compared with a
/// float uses the float's exact value, so the order stays transitive across
/// mixed integer and float values.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_integer_float(x, as_float(b)),
        (None, Some(y)) => compare_integer_float(y, as_float(a)).reverse(),
        (None, None) => {
            let (x, y) = (as_float(a), as_float(b));
            x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
        }
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn as_float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn compare_integer_float(int: i128, float: f64) -> Ordering {
    // 2^127, the first float outside the i128 range.
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if float.is_nan() || float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => whole.total_cmp(&float),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers() {
        assert_eq!(compare_values(&json!(1), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(-3), &json!(-3)), Some(Ordering::Equal));
        assert_eq!(
            compare_values(&json!(u64::MAX), &json!(u64::MAX - 1)),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_values(&json!(-1), &json!(u64::MAX)), Some(Ordering::Less));
    }

    #[test]
    fn integers_beyond_f64_precision_stay_distinct() {
        let two_53 = 9_007_199_254_740_992u64;
        assert_eq!(
            compare_values(&json!(two_53 + 1), &json!(two_53)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&json!(u64::MAX), &json!(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&json!(i64::MIN), &json!(i64::MIN + 1)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn integer_against_float_is_exact() {
        // 2^53 + 1 is not representable; the float literal is exactly 2^53.
        assert_eq!(
            compare_values(&json!(9_007_199_254_740_993u64), &json!(9_007_199_254_740_992.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_values(&json!(3), &json!(3.0)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!(-3), &json!(-2.5)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(0), &json!(-0.5)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(1.0e30), &json!(u64::MAX)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(0.0), &json!(-0.0)), Some(Ordering::Equal));
    }

    #[test]
    fn iso_timestamps_order_chronologically() {
        assert_eq!(
            compare_values(
                &json!("2024-02-01T00:00:00.000Z"),
                &json!("2024-01-15T23:59:59.999Z")
            ),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn booleans_and_null() {
        assert_eq!(compare_values(&json!(false), &json!(true)), Some(Ordering::Less));
        assert_eq!(compare_values(&Value::Null, &Value::Null), Some(Ordering::Equal));
    }

    #[test]
    fn mismatched_types_are_incomparable() {
        assert_eq!(compare_values(&json!("5"), &json!(5)), None);
        assert_eq!(compare_values(&json!(true), &json!(1)), None);
        assert_eq!(compare_values(&Value::Null, &json!(0)), None);
    }

    #[test]
    fn containers_are_incomparable() {
        assert_eq!(compare_values(&json!([1]), &json!([1])), None);
        assert_eq!(compare_values(&json!({}), &json!({})), None);
    }
}
