//! Tag records.

use crate::uuids::TypedUuid;

pub type TagUuid = TypedUuid<Tag>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub uuid: TagUuid,
    pub name: String,
}
