//! Sled-backed metadata store.

use super::{MetadataStore, StoreConfig};
use crate::error::Error;
use crate::metadata::{AssemblyDescriptor, MetadataKind, ObjectId};
use sled::{Db, Tree};
use tracing::{debug, info};

/// Tree name for committed assemblies.
const ASSEMBLY_TREE: &str = "metadata:assemblies";

/// Tree name for store metadata.
const META_TREE: &str = "metadata:meta";

/// Key for the current commit version in the meta tree.
const CURRENT_VERSION_KEY: &[u8] = b"current_version";

/// Metadata store persisting assemblies in sled.
pub struct SledStore {
    /// The underlying sled database.
    db: Db,
    /// Assemblies keyed by name.
    assembly_tree: Tree,
    /// Store metadata.
    meta_tree: Tree,
    /// Current commit version (cached).
    current_version: u64,
}

impl SledStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: &StoreConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        Self::from_db(db)
    }

    /// Open a store on an already opened sled database.
    pub fn from_db(db: Db) -> Result<Self, Error> {
        let assembly_tree = db.open_tree(ASSEMBLY_TREE)?;
        let meta_tree = db.open_tree(META_TREE)?;

        let current_version = match meta_tree.get(CURRENT_VERSION_KEY)? {
            Some(bytes) => {
                let buf: [u8; 8] = bytes.as_ref().try_into().map_err(|_| {
                    Error::InvalidData("corrupt commit version".into())
                })?;
                u64::from_be_bytes(buf)
            }
            None => 0,
        };

        debug!(current_version, "Opened metadata store");

        Ok(Self {
            db,
            assembly_tree,
            meta_tree,
            current_version,
        })
    }

    /// Current commit version (0 before the first save).
    pub fn current_version(&self) -> u64 {
        self.current_version
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.assembly_tree.flush()?;
        self.meta_tree.flush()?;
        Ok(())
    }
}

impl MetadataStore for SledStore {
    fn create_object(&mut self, _kind: MetadataKind) -> Result<ObjectId, Error> {
        Ok(ObjectId(self.db.generate_id()?))
    }

    fn save_assembly(&mut self, assembly: &AssemblyDescriptor) -> Result<u64, Error> {
        let new_version = self.current_version + 1;

        let value = assembly.to_bytes()?;
        self.assembly_tree.insert(assembly.name.as_bytes(), value)?;
        self.meta_tree
            .insert(CURRENT_VERSION_KEY, &new_version.to_be_bytes())?;
        self.current_version = new_version;

        info!(
            assembly = %assembly.name,
            classes = assembly.classes.len(),
            version = new_version,
            "Saved assembly"
        );

        Ok(new_version)
    }

    fn load_assembly(&self, name: &str) -> Result<Option<AssemblyDescriptor>, Error> {
        match self.assembly_tree.get(name.as_bytes())? {
            Some(bytes) => Ok(Some(AssemblyDescriptor::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn assembly_names(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        for key in self.assembly_tree.iter().keys() {
            let key = key?;
            let name = String::from_utf8(key.to_vec())
                .map_err(|e| Error::InvalidData(e.to_string()))?;
            names.push(name);
        }
        Ok(names)
    }

    fn known_types(&self) -> Result<Vec<String>, Error> {
        let mut types = Vec::new();
        for value in self.assembly_tree.iter().values() {
            let assembly = AssemblyDescriptor::from_bytes(&value?)?;
            types.extend(assembly.class_full_names());
        }
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassDescriptor;

    fn sample_assembly(name: &str) -> AssemblyDescriptor {
        let mut assembly = AssemblyDescriptor::new(ObjectId(1), name);
        assembly
            .classes
            .push(ClassDescriptor::new(ObjectId(2), "Invoice", name));
        assembly
            .classes
            .push(ClassDescriptor::new(ObjectId(3), "InvoiceLine", name));
        assembly
    }

    #[test]
    fn test_open_empty() {
        let store = SledStore::open(&StoreConfig::temporary()).unwrap();

        assert_eq!(store.current_version(), 0);
        assert!(store.assembly_names().unwrap().is_empty());
        assert!(store.known_types().unwrap().is_empty());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let mut store = SledStore::open(&StoreConfig::temporary()).unwrap();

        let first = store.create_object(MetadataKind::Class).unwrap();
        let second = store.create_object(MetadataKind::Class).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = SledStore::open(&StoreConfig::temporary()).unwrap();

        let version = store.save_assembly(&sample_assembly("Billing")).unwrap();
        assert_eq!(version, 1);

        let loaded = store.load_assembly("Billing").unwrap().unwrap();
        assert_eq!(loaded, sample_assembly("Billing"));
        assert!(store.load_assembly("Missing").unwrap().is_none());

        let mut types = store.known_types().unwrap();
        types.sort();
        assert_eq!(types, vec!["Billing.Invoice", "Billing.InvoiceLine"]);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path());

        {
            let mut store = SledStore::open(&config).unwrap();
            store.save_assembly(&sample_assembly("Billing")).unwrap();
            store.save_assembly(&sample_assembly("Shipping")).unwrap();
            store.flush().unwrap();
        }

        {
            let store = SledStore::open(&config).unwrap();
            assert_eq!(store.current_version(), 2);
            assert_eq!(
                store.assembly_names().unwrap(),
                vec!["Billing".to_string(), "Shipping".to_string()]
            );
        }
    }
}
