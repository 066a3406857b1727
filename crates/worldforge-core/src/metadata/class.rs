//! Class definitions.

use super::attribute::TypeAttribute;
use super::member::MemberDescriptor;
use super::types::{ObjectId, TemplateKind};
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A persistent class definition (table schema).
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct ClassDescriptor {
    /// Store-assigned identifier.
    pub oid: ObjectId,
    /// Class name (unique within its assembly).
    pub name: String,
    /// Name of the owning assembly.
    pub assembly: String,
    /// Members in declaration order.
    pub members: Vec<MemberDescriptor>,
    /// Class-level attributes.
    pub type_attributes: Vec<TypeAttribute>,
    /// Fully qualified name of the base type, if any.
    pub base_type_full_name: Option<String>,
    /// Code template the class is generated with.
    pub template: TemplateKind,
}

impl ClassDescriptor {
    /// Create an empty class using the class template.
    pub fn new(oid: ObjectId, name: impl Into<String>, assembly: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            assembly: assembly.into(),
            members: Vec::new(),
            type_attributes: Vec::new(),
            base_type_full_name: None,
            template: TemplateKind::Class,
        }
    }

    /// Fully qualified name (`<assembly>.<class>`).
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.assembly, self.name)
    }

    /// Get a member by name.
    pub fn get_member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Check if a member with this name exists.
    pub fn has_member(&self, name: &str) -> bool {
        self.get_member(name).is_some()
    }

    /// Names of all members in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// All reference members.
    pub fn reference_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.is_reference())
    }

    /// All collection members.
    pub fn collection_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.is_collection())
    }

    /// Number of default class options markers on this class.
    pub fn default_class_options_count(&self) -> usize {
        self.type_attributes
            .iter()
            .filter(|a| a.is_default_class_options())
            .count()
    }
}
