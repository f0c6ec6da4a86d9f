//! Row structs and request DTOs.

pub mod project;
pub mod task;

use serde::{Deserialize, Deserializer};

/// Deserialize a PATCH field that may be omitted, explicitly `null`, or set.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: an omitted
/// field stays `None` through `default`, `null` becomes `Some(None)` and a
/// value becomes `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
