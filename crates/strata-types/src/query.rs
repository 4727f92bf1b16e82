use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Comparison applied by a query leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    /// Equal (the default when a leaf omits `op`).
    #[default]
    Eq,
    /// Not equal.
    #[serde(alias = "neq")]
    Ne,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        };
        f.write_str(s)
    }
}

/// Recursive predicate tree evaluated against decoded documents.
///
/// On the wire a query is one of:
///
/// ```text
/// { "path": "context.account.email", "op": "eq", "value": "a@b.c" }   // op optional
/// { "op": "and" | "or", "queries": [ ... ] }
/// { "op": "not", "query": { ... } }
/// ```
///
/// `And([])` matches everything and `Or([])` matches nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "QueryRepr", into = "QueryRepr")]
pub enum StorageQuery {
    /// Compare the value at a dotted `path` against `value`.
    Compare {
        path: String,
        op: CompareOp,
        value: Value,
    },
    /// All sub-queries must match.
    And(Vec<StorageQuery>),
    /// At least one sub-query must match.
    Or(Vec<StorageQuery>),
    /// The sub-query must not match.
    Not(Box<StorageQuery>),
}

impl StorageQuery {
    /// Build a comparison leaf.
    pub fn compare(path: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Eq, value)
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Ne, value)
    }

    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gt, value)
    }

    pub fn gte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gte, value)
    }

    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lt, value)
    }

    pub fn lte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lte, value)
    }

    pub fn and(queries: impl IntoIterator<Item = StorageQuery>) -> Self {
        Self::And(queries.into_iter().collect())
    }

    pub fn or(queries: impl IntoIterator<Item = StorageQuery>) -> Self {
        Self::Or(queries.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(query: StorageQuery) -> Self {
        Self::Not(Box::new(query))
    }

    /// Parse the JSON wire form of a query.
    pub fn from_json(input: &str) -> Result<Self, TypeError> {
        serde_json::from_str(input).map_err(|e| TypeError::InvalidQuery(e.to_string()))
    }

    /// Number of comparison leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Compare { .. } => 1,
            Self::And(queries) | Self::Or(queries) => queries.iter().map(Self::leaf_count).sum(),
            Self::Not(query) => query.leaf_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire representation
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum GroupOp {
    And,
    Or,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
enum NegationOp {
    #[serde(rename = "not")]
    Not,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum QueryRepr {
    Group {
        op: GroupOp,
        queries: Vec<StorageQuery>,
    },
    Negation {
        op: NegationOp,
        query: Box<StorageQuery>,
    },
    Compare {
        path: String,
        #[serde(default)]
        op: CompareOp,
        value: Value,
    },
}

impl From<QueryRepr> for StorageQuery {
    fn from(repr: QueryRepr) -> Self {
        match repr {
            QueryRepr::Group {
                op: GroupOp::And,
                queries,
            } => Self::And(queries),
            QueryRepr::Group {
                op: GroupOp::Or,
                queries,
            } => Self::Or(queries),
            QueryRepr::Negation { query, .. } => Self::Not(query),
            QueryRepr::Compare { path, op, value } => Self::Compare { path, op, value },
        }
    }
}

impl From<StorageQuery> for QueryRepr {
    fn from(query: StorageQuery) -> Self {
        match query {
            StorageQuery::And(queries) => Self::Group {
                op: GroupOp::And,
                queries,
            },
            StorageQuery::Or(queries) => Self::Group {
                op: GroupOp::Or,
                queries,
            },
            StorageQuery::Not(query) => Self::Negation {
                op: NegationOp::Not,
                query,
            },
            StorageQuery::Compare { path, op, value } => Self::Compare { path, op, value },
        }
    }
}
