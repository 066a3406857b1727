//! In-memory metadata store.

use super::MetadataStore;
use crate::error::Error;
use crate::metadata::{AssemblyDescriptor, MetadataKind, ObjectId};
use std::collections::{BTreeMap, HashMap};

/// Metadata store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: u64,
    version: u64,
    assemblies: BTreeMap<String, AssemblyDescriptor>,
    created: HashMap<MetadataKind, usize>,
    fail_on: Option<MetadataKind>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent creation of `kind` fail.
    pub fn fail_on(mut self, kind: MetadataKind) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// Number of objects of `kind` created so far.
    pub fn created(&self, kind: MetadataKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }
}

impl MetadataStore for MemoryStore {
    fn create_object(&mut self, kind: MetadataKind) -> Result<ObjectId, Error> {
        if self.fail_on == Some(kind) {
            return Err(Error::CreateFailed {
                kind,
                reason: "injected failure".into(),
            });
        }
        self.next_id += 1;
        *self.created.entry(kind).or_default() += 1;
        Ok(ObjectId(self.next_id))
    }

    fn save_assembly(&mut self, assembly: &AssemblyDescriptor) -> Result<u64, Error> {
        self.assemblies
            .insert(assembly.name.clone(), assembly.clone());
        self.version += 1;
        Ok(self.version)
    }

    fn load_assembly(&self, name: &str) -> Result<Option<AssemblyDescriptor>, Error> {
        Ok(self.assemblies.get(name).cloned())
    }

    fn assembly_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.assemblies.keys().cloned().collect())
    }

    fn known_types(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .assemblies
            .values()
            .flat_map(|a| a.class_full_names())
            .collect())
    }
}
