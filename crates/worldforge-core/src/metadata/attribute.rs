//! Type attributes attached to classes and members.

use super::types::ObjectId;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Named pairing between a reference member and its inverse collection.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct AssociationAttribute {
    /// Store-assigned identifier.
    pub oid: ObjectId,
    /// Association name shared by both sides of the relation.
    pub association_name: String,
}

/// A marker attached to a class or member descriptor.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub enum TypeAttribute {
    /// Default class options (class gets a navigation item and default views).
    DefaultClassOptions {
        /// Store-assigned identifier.
        oid: ObjectId,
    },
    /// Association tag on a relational member.
    Association(AssociationAttribute),
}

impl TypeAttribute {
    /// Check if this is a default class options marker.
    pub fn is_default_class_options(&self) -> bool {
        matches!(self, TypeAttribute::DefaultClassOptions { .. })
    }

    /// Get the association attribute, if this is one.
    pub fn as_association(&self) -> Option<&AssociationAttribute> {
        match self {
            TypeAttribute::Association(association) => Some(association),
            _ => None,
        }
    }
}
