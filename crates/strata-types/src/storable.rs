use serde::de::DeserializeOwned;
use serde::Serialize;

/// A domain object that can be persisted by a storage backend.
///
/// The pair `(KIND, id())` addresses the object. Backends never interpret
/// the payload beyond the JSON tree produced by the object's `Serialize`
/// impl; the query engine walks that tree by dotted paths.
///
/// Implementations must round-trip: decoding the encoded form of an object
/// yields an equal object.
pub trait Storable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection tag. Forms the key namespace for every object of this type.
    const KIND: &'static str;

    /// Identifier, unique within [`Storable::KIND`].
    fn id(&self) -> &str;
}
