//! Taggable records

use crate::uuids::TypedUuid;

/// Records that can carry tags. `KIND` is the value stored in
/// `taggables.taggable_type`.
pub(crate) trait Taggable {
    const KIND: &'static str;
}

impl<T: Taggable> Taggable for TypedUuid<T> {
    const KIND: &'static str = T::KIND;
}
