//! Member definitions for classes.

use super::attribute::{AssociationAttribute, TypeAttribute};
use super::types::{DataType, ObjectId, RelationType, TemplateKind};
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// What a member stores.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub enum MemberKind {
    /// A scalar value.
    Simple {
        /// Storage type of the value.
        data_type: DataType,
    },
    /// A many-to-one reference to another class.
    Reference {
        /// Fully qualified name of the referenced type.
        reference_type_full_name: String,
        /// Relation direction.
        relation_type: RelationType,
    },
    /// The "one" side of a one-to-many relation.
    Collection {
        /// Fully qualified name of the element type.
        collection_type_full_name: String,
        /// Relation direction.
        relation_type: RelationType,
    },
}

/// A member definition within a class.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct MemberDescriptor {
    /// Store-assigned identifier.
    pub oid: ObjectId,
    /// Member name (unique within the owning class).
    pub name: String,
    /// Member variant.
    pub kind: MemberKind,
    /// Code template the member is generated with.
    pub template: TemplateKind,
    /// Attributes in declaration order.
    pub type_attributes: Vec<TypeAttribute>,
}

impl MemberDescriptor {
    /// Create a member with no attributes.
    pub fn new(oid: ObjectId, name: impl Into<String>, kind: MemberKind, template: TemplateKind) -> Self {
        Self {
            oid,
            name: name.into(),
            kind,
            template,
            type_attributes: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: TypeAttribute) -> Self {
        self.type_attributes.push(attribute);
        self
    }

    /// Scalar type of a simple member.
    pub fn data_type(&self) -> Option<DataType> {
        match &self.kind {
            MemberKind::Simple { data_type } => Some(*data_type),
            _ => None,
        }
    }

    /// Full name of the related type for reference and collection members.
    pub fn target_full_name(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Reference {
                reference_type_full_name,
                ..
            } => Some(reference_type_full_name),
            MemberKind::Collection {
                collection_type_full_name,
                ..
            } => Some(collection_type_full_name),
            MemberKind::Simple { .. } => None,
        }
    }

    /// Relation direction for relational members.
    pub fn relation_type(&self) -> Option<RelationType> {
        match &self.kind {
            MemberKind::Reference { relation_type, .. }
            | MemberKind::Collection { relation_type, .. } => Some(*relation_type),
            MemberKind::Simple { .. } => None,
        }
    }

    /// First association attribute on this member.
    pub fn association(&self) -> Option<&AssociationAttribute> {
        self.type_attributes
            .iter()
            .find_map(TypeAttribute::as_association)
    }

    /// Association name carried by this member, if any.
    pub fn association_name(&self) -> Option<&str> {
        self.association().map(|a| a.association_name.as_str())
    }

    /// Check if this is a reference member.
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, MemberKind::Reference { .. })
    }

    /// Check if this is a collection member.
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, MemberKind::Collection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_member() {
        let member = MemberDescriptor::new(
            ObjectId(1),
            "Name",
            MemberKind::Simple {
                data_type: DataType::String,
            },
            TemplateKind::ReadWriteMember,
        );

        assert_eq!(member.data_type(), Some(DataType::String));
        assert!(member.target_full_name().is_none());
        assert!(member.relation_type().is_none());
        assert!(member.association().is_none());
    }

    #[test]
    fn test_collection_member_association() {
        let member = MemberDescriptor::new(
            ObjectId(2),
            "Orders",
            MemberKind::Collection {
                collection_type_full_name: "Sales.Order".into(),
                relation_type: RelationType::OneToMany,
            },
            TemplateKind::ReadOnlyMember,
        )
        .with_attribute(TypeAttribute::Association(AssociationAttribute {
            oid: ObjectId(3),
            association_name: "Customer-Orders".into(),
        }));

        assert!(member.is_collection());
        assert!(!member.is_reference());
        assert_eq!(member.target_full_name(), Some("Sales.Order"));
        assert_eq!(member.association_name(), Some("Customer-Orders"));
        assert_eq!(member.relation_type(), Some(RelationType::OneToMany));
    }
}
