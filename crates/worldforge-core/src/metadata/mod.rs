//! Persistent metadata descriptors.
//!
//! These are the in-memory shapes of the classes, members and attributes a
//! builder session produces and a metadata store persists.

mod assembly;
mod attribute;
mod class;
mod member;
mod types;

pub use assembly::{generate_assembly_name, AssemblyDescriptor};
pub use attribute::{AssociationAttribute, TypeAttribute};
pub use class::ClassDescriptor;
pub use member::{MemberDescriptor, MemberKind};
pub use types::{
    DataType, ExternalType, MetadataKind, ObjectId, RelationType, TemplateKind, UnknownDataType,
};
