use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::query::StorageQuery;

/// Sort direction for ordered list results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl FromStr for OrderDirection {
    type Err = TypeError;

    /// Accepts `asc`/`ascending` and `desc`/`descending`, ignoring case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(TypeError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Fully-normalized options for a `list` call.
///
/// `limit: None` means unbounded. The window `[offset, offset + limit)` is
/// applied after filtering and sorting the whole collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageListOptions {
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub query: Option<StorageQuery>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub order_by_direction: OrderDirection,
}

impl StorageListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query(mut self, query: StorageQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order_by_direction = direction;
        self
    }

    /// Options that keep only the filter, as used by `count`.
    pub fn filter_only(query: Option<StorageQuery>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Slice bounds `[start, end)` of the requested page within `len` matches.
    pub fn window(&self, len: usize) -> (usize, usize) {
        let start = self.offset.min(len);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(len),
            None => len,
        };
        (start, end)
    }
}

/// List parameters as received from a caller, before normalization.
///
/// Every field is optional and `orderByDirection` is free text; the list
/// facade turns this into [`StorageListOptions`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub query: Option<StorageQuery>,
    pub order_by: Option<String>,
    pub order_by_direction: Option<String>,
}
