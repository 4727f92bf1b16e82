use serde_json::Value;

/// Resolve a dotted `path` (e.g. `context.account.email`) inside `document`.
///
/// Each segment selects a key of an object. A segment that is an unsigned
/// integer also indexes into an array (`items.0.name`). Returns `None` as
/// soon as a segment cannot be followed. The empty path resolves to nothing.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(document, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
}
