//! Worldforge Core - runtime construction of persistent schema metadata.
//!
//! This crate builds graphs of class, member, association and inheritance
//! descriptors through a fluent, phase-scoped API and hands the result to a
//! metadata store.

pub mod builder;
pub mod error;
pub mod metadata;
pub mod store;

pub use builder::{
    AssemblyBuilder, AssociationMismatch, BuildError, BuilderConfig, ClassBatch, ClassHandler,
    ClassId, Commit, NameScope, TypeRef,
};
pub use error::Error;
pub use metadata::{
    AssemblyDescriptor, AssociationAttribute, ClassDescriptor, DataType, ExternalType,
    MemberDescriptor, MemberKind, MetadataKind, ObjectId, RelationType, TemplateKind,
    TypeAttribute,
};
pub use store::{MemoryStore, MetadataStore, SledStore, StoreConfig};
