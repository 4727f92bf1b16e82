//! Physical key layout.
//!
//! An object of kind `event` with id `42` is stored under `event:42`. Kinds
//! may not contain the separator, so the prefix `event:` selects exactly the
//! `event` collection. Ids are unrestricted.

use crate::error::{StoreError, StoreResult};

/// Separator between kind and id in a physical key.
pub const SEPARATOR: char = ':';

/// Validate a kind for use as a key namespace.
pub fn validate_kind(kind: &str) -> StoreResult<()> {
    if kind.is_empty() {
        return Err(StoreError::InvalidKind {
            kind: kind.to_string(),
            reason: "kind must not be empty",
        });
    }
    if kind.contains(SEPARATOR) {
        return Err(StoreError::InvalidKind {
            kind: kind.to_string(),
            reason: "kind must not contain ':'",
        });
    }
    Ok(())
}

/// Key prefix shared by every object of `kind`.
pub fn namespace(kind: &str) -> StoreResult<String> {
    validate_kind(kind)?;
    Ok(format!("{kind}{SEPARATOR}"))
}

/// Physical key of the object `(kind, id)`.
pub fn object_key(kind: &str, id: &str) -> StoreResult<String> {
    validate_kind(kind)?;
    Ok(format!("{kind}{SEPARATOR}{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_layout() {
        assert_eq!(object_key("event", "42").unwrap(), "event:42");
        assert_eq!(namespace("event").unwrap(), "event:");
    }

    #[test]
    fn ids_may_contain_separator() {
        let key = object_key("session", "a:b:c").unwrap();
        assert_eq!(key, "session:a:b:c");
        assert!(key.starts_with(&namespace("session").unwrap()));
    }

    #[test]
    fn kind_validation() {
        assert!(validate_kind("request_log").is_ok());
        assert!(matches!(
            validate_kind(""),
            Err(StoreError::InvalidKind { .. })
        ));
        assert!(matches!(
            object_key("a:b", "1"),
            Err(StoreError::InvalidKind { .. })
        ));
    }

    #[test]
    fn namespaces_of_prefix_kinds_do_not_overlap() {
        let short = namespace("event").unwrap();
        let long_key = object_key("events", "1").unwrap();
        let underscored = object_key("event_log", "1").unwrap();
        assert!(!long_key.starts_with(&short));
        assert!(!underscored.starts_with(&short));
    }
}
