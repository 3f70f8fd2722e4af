//! Traits shared by every record the list-view engine can hold.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record with a stable identifier.
///
/// Entities are immutable snapshots from the API: the engine replaces them,
/// it never edits one in place.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// HTTP verb a resource accepts for partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMethod {
    #[default]
    Put,
    Patch,
}

impl fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMethod::Put => write!(f, "PUT"),
            UpdateMethod::Patch => write!(f, "PATCH"),
        }
    }
}

/// An entity served by a REST endpoint.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    /// Body sent when creating a new record.
    type Draft: Serialize + Send + Sync;

    /// Path segment under the API prefix, e.g. `"posts"`.
    const PATH: &'static str;

    /// Key wrapping the collection in `{ "<key>": [...] }` responses.
    const COLLECTION_KEY: &'static str;

    /// Key wrapping a single record in `{ "<key>": {...} }` responses.
    const ENTITY_KEY: &'static str;

    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Put;
}
