use strata_types::CodecError;

/// Errors raised by an ordered key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the redb database.
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("backend lock poisoned")]
    Poisoned,
}

impl From<redb::DatabaseError> for KvError {
    fn from(e: redb::DatabaseError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::TableError> for KvError {
    fn from(e: redb::TableError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::StorageError> for KvError {
    fn from(e: redb::StorageError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::CommitError> for KvError {
    fn from(e: redb::CommitError) -> Self {
        Self::Redb(e.into())
    }
}

/// Result alias for backend operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under `(kind, id)`.
    #[error("object not found: {kind}:{id}")]
    NotFound { kind: String, id: String },

    /// A point read returned a payload that does not decode.
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    /// The object could not be encoded for writing.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },

    /// The underlying store reported a failure.
    #[error("store I/O error: {0}")]
    Kv(#[from] KvError),

    /// A scan stream closed before signalling its end.
    #[error("scan stream closed unexpectedly")]
    UnexpectedStreamTermination,

    /// The operation is not supported by this backend.
    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),

    /// The kind cannot be used as a key namespace.
    #[error("invalid kind {kind:?}: {reason}")]
    InvalidKind { kind: String, reason: &'static str },

    /// List parameters could not be normalized.
    #[error("invalid list parameters: {0}")]
    InvalidListParams(String),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A blocking backend task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Background(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
