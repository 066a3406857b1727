//! Metadata store adapters.
//!
//! A store allocates every metadata object a builder creates and persists
//! committed assemblies. The builder never looks behind this trait.

mod config;
mod memory;
mod sled_store;

pub use config::StoreConfig;
pub use memory::MemoryStore;
pub use sled_store::SledStore;

use crate::error::Error;
use crate::metadata::{AssemblyDescriptor, MetadataKind, ObjectId};

/// Factory and persistence capability for metadata objects.
pub trait MetadataStore {
    /// Allocate a new object of the given kind.
    ///
    /// Failures abort the builder call in progress.
    fn create_object(&mut self, kind: MetadataKind) -> Result<ObjectId, Error>;

    /// Persist an assembly, replacing any earlier assembly with the same name.
    /// Returns the store's new commit version.
    fn save_assembly(&mut self, assembly: &AssemblyDescriptor) -> Result<u64, Error>;

    /// Load a committed assembly by name.
    fn load_assembly(&self, name: &str) -> Result<Option<AssemblyDescriptor>, Error>;

    /// Names of all committed assemblies, sorted.
    fn assembly_names(&self) -> Result<Vec<String>, Error>;

    /// Fully qualified names of every class in every committed assembly.
    fn known_types(&self) -> Result<Vec<String>, Error>;
}

impl<T: MetadataStore + ?Sized> MetadataStore for &mut T {
    fn create_object(&mut self, kind: MetadataKind) -> Result<ObjectId, Error> {
        (**self).create_object(kind)
    }

    fn save_assembly(&mut self, assembly: &AssemblyDescriptor) -> Result<u64, Error> {
        (**self).save_assembly(assembly)
    }

    fn load_assembly(&self, name: &str) -> Result<Option<AssemblyDescriptor>, Error> {
        (**self).load_assembly(name)
    }

    fn assembly_names(&self) -> Result<Vec<String>, Error> {
        (**self).assembly_names()
    }

    fn known_types(&self) -> Result<Vec<String>, Error> {
        (**self).known_types()
    }
}
