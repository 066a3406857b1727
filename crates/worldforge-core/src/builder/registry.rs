//! Class registry: class creation, lookup and target resolution.

use super::error::{BuildError, NameScope};
use super::handler::{AssemblyBuilder, ClassBatch, TypeRef};
use crate::metadata::{ClassDescriptor, MetadataKind};
use crate::store::MetadataStore;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Session counter; ties class handles to the builder that issued them.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

pub(super) fn next_session() -> u64 {
    NEXT_SESSION.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a class created by a builder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId {
    session: u64,
    index: usize,
}

impl ClassId {
    /// Position of the class in its assembly.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class #{} of session {}", self.index, self.session)
    }
}

/// A target resolved to its simple and fully qualified names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ResolvedType {
    pub name: String,
    pub full_name: String,
}

impl<S: MetadataStore> AssemblyBuilder<S> {
    /// Create one class per name, in order, and return a handler scoped to
    /// exactly those classes.
    ///
    /// Names are checked against each other and against the assembly before
    /// any class is created.
    pub fn create_classes<I>(&mut self, names: I) -> Result<ClassBatch<'_, S>, BuildError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for name in &names {
            if self.assembly.has_class(name) || !seen.insert(name.as_str()) {
                return Err(BuildError::DuplicateName {
                    scope: NameScope::Assembly(self.assembly.name.clone()),
                    name: name.clone(),
                });
            }
        }

        let mut scope = Vec::with_capacity(names.len());
        for name in names {
            let oid = self.store.create_object(MetadataKind::Class)?;
            let class = ClassDescriptor::new(oid, name, self.assembly.name.as_str());
            debug!(class = %class.full_name(), %oid, "Created class");
            self.assembly.classes.push(class);
            scope.push(self.assembly.classes.len() - 1);
        }

        self.last_scope = scope.clone();
        Ok(ClassBatch {
            builder: self,
            scope,
        })
    }

    /// Find a class of this session by name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.assembly
            .classes
            .iter()
            .position(|c| c.name == name)
            .map(|index| self.class_id_at(index))
    }

    /// Descriptor of a class of this session.
    pub fn class(&self, id: ClassId) -> Option<&ClassDescriptor> {
        if id.session != self.session {
            return None;
        }
        self.assembly.classes.get(id.index)
    }

    pub(super) fn class_id_at(&self, index: usize) -> ClassId {
        ClassId {
            session: self.session,
            index,
        }
    }

    /// Index of a class handle, rejecting handles from other sessions.
    pub(super) fn class_index(&self, id: ClassId) -> Result<usize, BuildError> {
        match self.class(id) {
            Some(_) => Ok(id.index),
            None => Err(BuildError::UnresolvedReference {
                class: self.assembly.name.clone(),
                target: id.to_string(),
            }),
        }
    }

    /// Resolve a target declared on the class at `from`.
    ///
    /// External names resolve against host-declared types, classes
    /// committed by earlier sessions, and classes of this session.
    pub(super) fn resolve(&self, from: usize, target: &TypeRef) -> Result<ResolvedType, BuildError> {
        let resolved = match target {
            TypeRef::Class(id) => self.class(*id).map(|class| ResolvedType {
                name: class.name.clone(),
                full_name: class.full_name(),
            }),
            TypeRef::External(external) => {
                let full_name = external.full_name();
                let known = self.external_types.contains(full_name)
                    || self.committed_types.contains(full_name)
                    || self.assembly.class_by_full_name(full_name).is_some();
                known.then(|| ResolvedType {
                    name: external.name().to_string(),
                    full_name: full_name.to_string(),
                })
            }
        };

        resolved.ok_or_else(|| BuildError::UnresolvedReference {
            class: self.assembly.classes[from].full_name(),
            target: match target {
                TypeRef::Class(id) => id.to_string(),
                TypeRef::External(external) => external.full_name().to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ExternalType, TemplateKind};
    use crate::store::MemoryStore;
    use crate::BuilderConfig;

    fn builder(store: &mut MemoryStore) -> AssemblyBuilder<&mut MemoryStore> {
        AssemblyBuilder::open_with_config(store, BuilderConfig::named("Crm")).unwrap()
    }

    #[test]
    fn test_classes_created_in_order() {
        let mut store = MemoryStore::new();
        let mut builder = builder(&mut store);

        builder.create_classes(["Person", "Company", "Address"]).unwrap();

        let assembly = builder.assembly();
        assert_eq!(assembly.class_names(), vec!["Person", "Company", "Address"]);
        assert!(assembly
            .classes
            .iter()
            .all(|c| c.template == TemplateKind::Class && c.assembly == "Crm"));
    }

    #[test]
    fn test_duplicate_within_call() {
        let mut store = MemoryStore::new();
        let mut builder = builder(&mut store);

        let result = builder.create_classes(["Person", "Person"]);

        assert!(matches!(
            result,
            Err(BuildError::DuplicateName { ref name, .. }) if name == "Person"
        ));
        assert!(builder.assembly().classes.is_empty());
    }

    #[test]
    fn test_duplicate_across_calls() {
        let mut store = MemoryStore::new();
        let mut builder = builder(&mut store);
        builder.create_classes(["Person"]).unwrap();

        let result = builder.create_classes(["Company", "Person"]);

        assert!(matches!(
            result,
            Err(BuildError::DuplicateName { scope: NameScope::Assembly(_), .. })
        ));
        assert_eq!(builder.assembly().class_names(), vec!["Person"]);
    }

    #[test]
    fn test_store_failure_aborts_call() {
        let mut store = MemoryStore::new().fail_on(MetadataKind::Class);
        let mut builder = builder(&mut store);

        let result = builder.create_classes(["Person"]);

        assert!(matches!(result, Err(BuildError::Store(_))));
        assert!(builder.assembly().classes.is_empty());
    }

    #[test]
    fn test_foreign_class_id_rejected() {
        let mut first_store = MemoryStore::new();
        let mut first = builder(&mut first_store);
        first.create_classes(["Person"]).unwrap();
        let foreign = first.class_id("Person").unwrap();

        let mut second_store = MemoryStore::new();
        let mut second = builder(&mut second_store);
        second.create_classes(["Person"]).unwrap();

        assert!(second.class(foreign).is_none());
        assert!(second.resolve(0, &TypeRef::Class(foreign)).is_err());
    }

    #[test]
    fn test_resolve_external_types() {
        let mut store = MemoryStore::new();
        let mut builder = builder(&mut store);
        builder.register_external_type("System.Object");
        builder.create_classes(["Person"]).unwrap();

        let object = builder
            .resolve(0, &TypeRef::External(ExternalType::new("System.Object")))
            .unwrap();
        assert_eq!(object.name, "Object");
        assert_eq!(object.full_name, "System.Object");

        let own = builder
            .resolve(0, &TypeRef::External(ExternalType::new("Crm.Person")))
            .unwrap();
        assert_eq!(own.name, "Person");

        let missing = builder.resolve(0, &TypeRef::External(ExternalType::new("System.Missing")));
        assert!(matches!(
            missing,
            Err(BuildError::UnresolvedReference { ref target, .. }) if target == "System.Missing"
        ));
    }
}
