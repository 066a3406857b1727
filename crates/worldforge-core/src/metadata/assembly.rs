//! Assembly descriptors: the root of one builder session.

use super::class::ClassDescriptor;
use super::types::ObjectId;
use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Generate a process-unique assembly name (`a` followed by 32 hex digits).
pub fn generate_assembly_name() -> String {
    format!("a{}", uuid::Uuid::new_v4().simple())
}

/// A named group of classes built and committed together.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct AssemblyDescriptor {
    /// Store-assigned identifier.
    pub oid: ObjectId,
    /// Assembly name, also the namespace of its classes.
    pub name: String,
    /// Classes in creation order.
    pub classes: Vec<ClassDescriptor>,
}

impl AssemblyDescriptor {
    /// Create an empty assembly.
    pub fn new(oid: ObjectId, name: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            classes: Vec::new(),
        }
    }

    /// Get a class by name.
    pub fn get_class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Get a class by its fully qualified name.
    pub fn class_by_full_name(&self, full_name: &str) -> Option<&ClassDescriptor> {
        let name = full_name.strip_prefix(self.name.as_str())?.strip_prefix('.')?;
        self.get_class(name)
    }

    /// Check if a class with this name exists.
    pub fn has_class(&self, name: &str) -> bool {
        self.get_class(name).is_some()
    }

    /// Names of all classes in creation order.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Fully qualified names of all classes.
    pub fn class_full_names(&self) -> impl Iterator<Item = String> + '_ {
        self.classes.iter().map(ClassDescriptor::full_name)
    }

    /// Serialize the assembly to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize an assembly from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}
