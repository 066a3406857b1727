//! Builder facade: the assembly-level builder and the per-batch class handler.

use super::association::{find_association_mismatches, AssociationMismatch};
use super::config::BuilderConfig;
use super::error::{BuildError, NameScope};
use super::registry::{next_session, ClassId};
use crate::metadata::{
    generate_assembly_name, AssemblyDescriptor, ClassDescriptor, DataType, ExternalType,
    MetadataKind,
};
use crate::store::MetadataStore;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Target of a reference, collection or base type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A class created in the current session.
    Class(ClassId),
    /// A type known outside the current session.
    External(ExternalType),
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        TypeRef::Class(id)
    }
}

impl From<ExternalType> for TypeRef {
    fn from(external: ExternalType) -> Self {
        TypeRef::External(external)
    }
}

impl From<&ExternalType> for TypeRef {
    fn from(external: &ExternalType) -> Self {
        TypeRef::External(external.clone())
    }
}

/// Something that names a scalar data type.
pub trait IntoDataType {
    /// Map to a supported data type.
    fn into_data_type(self) -> Result<DataType, BuildError>;
}

impl IntoDataType for DataType {
    fn into_data_type(self) -> Result<DataType, BuildError> {
        Ok(self)
    }
}

impl IntoDataType for &str {
    fn into_data_type(self) -> Result<DataType, BuildError> {
        self.parse()
            .map_err(|_| BuildError::InvalidKind(self.to_string()))
    }
}

impl IntoDataType for String {
    fn into_data_type(self) -> Result<DataType, BuildError> {
        self.as_str().into_data_type()
    }
}

/// Result of committing an assembly.
#[derive(Debug, Clone)]
pub struct Commit {
    /// The committed assembly.
    pub assembly: AssemblyDescriptor,
    /// Store commit version.
    pub version: u64,
}

/// Builder for one assembly: the class-creation phase.
///
/// Not safe for concurrent mutation; it is the in-progress, uncommitted
/// schema edit of a single session.
pub struct AssemblyBuilder<S: MetadataStore> {
    pub(super) session: u64,
    pub(super) store: S,
    pub(super) assembly: AssemblyDescriptor,
    /// External type names declared by the host.
    pub(super) external_types: HashSet<String>,
    /// Classes committed by earlier sessions.
    pub(super) committed_types: HashSet<String>,
    /// Scope of the most recent class batch.
    pub(super) last_scope: Vec<usize>,
    strict_associations: bool,
}

impl<S: MetadataStore> AssemblyBuilder<S> {
    /// Open a builder over a new assembly with a generated name.
    pub fn open(store: S) -> Result<Self, BuildError> {
        Self::open_with_config(store, BuilderConfig::default())
    }

    /// Open a builder over a new assembly.
    ///
    /// Fails with a duplicate name if the store already holds an assembly of
    /// that name; committed assemblies are never reopened.
    pub fn open_with_config(mut store: S, config: BuilderConfig) -> Result<Self, BuildError> {
        let name = config.assembly_name.unwrap_or_else(generate_assembly_name);
        if store.load_assembly(&name)?.is_some() {
            return Err(BuildError::DuplicateName {
                scope: NameScope::Store,
                name,
            });
        }
        let oid = store.create_object(MetadataKind::Assembly)?;
        let committed_types = store.known_types()?.into_iter().collect();

        debug!(assembly = %name, "Opened assembly builder");

        Ok(Self {
            session: next_session(),
            store,
            assembly: AssemblyDescriptor::new(oid, name),
            external_types: config.external_types.into_iter().collect(),
            committed_types,
            last_scope: Vec::new(),
            strict_associations: config.strict_associations,
        })
    }

    /// Name of the assembly being built.
    pub fn name(&self) -> &str {
        &self.assembly.name
    }

    /// The assembly as built so far.
    pub fn assembly(&self) -> &AssemblyDescriptor {
        &self.assembly
    }

    /// Declare a type known outside the store.
    pub fn register_external_type(&mut self, full_name: impl Into<String>) {
        self.external_types.insert(full_name.into());
    }

    /// Reopen the class handler over the most recently created batch.
    pub fn last_batch(&mut self) -> ClassBatch<'_, S> {
        let scope = self.last_scope.clone();
        ClassBatch {
            builder: self,
            scope,
        }
    }

    /// Relations whose two sides carry different association names.
    pub fn association_mismatches(&self) -> Vec<AssociationMismatch> {
        find_association_mismatches(&self.assembly)
    }

    /// Check the invariants that are not enforced eagerly.
    pub fn validate(&self) -> Result<(), BuildError> {
        let mismatches = self.association_mismatches();
        for mismatch in &mismatches {
            warn!(%mismatch, "Association name mismatch");
        }
        match mismatches.into_iter().next() {
            Some(mismatch) => Err(BuildError::AssociationNameMismatch(mismatch)),
            None => Ok(()),
        }
    }

    /// Persist the assembly through the metadata store.
    #[instrument(skip(self), fields(assembly = %self.assembly.name))]
    pub fn commit(mut self) -> Result<Commit, BuildError> {
        if self.strict_associations {
            self.validate()?;
        } else {
            for mismatch in self.association_mismatches() {
                warn!(%mismatch, "Committing relation with mismatched association names");
            }
        }

        let version = self.store.save_assembly(&self.assembly)?;
        info!(
            classes = self.assembly.classes.len(),
            version,
            "Committed assembly"
        );

        Ok(Commit {
            assembly: self.assembly,
            version,
        })
    }
}

/// Member-declaration operations over a fixed set of classes.
///
/// Every selector is invoked exactly once per class in scope, in creation
/// order. Selectors read the graph built so far and must not create
/// descriptors themselves.
pub trait ClassHandler {
    /// Find a class of this handler by name.
    fn class_id(&self, name: &str) -> Option<ClassId>;

    /// Create a simple member of `kind` for every name the selector yields.
    fn create_simple_members<K, F, I>(&mut self, kind: K, selector: F) -> Result<&mut Self, BuildError>
    where
        K: IntoDataType,
        F: Fn(&ClassDescriptor) -> I,
        I: IntoIterator,
        I::Item: Into<String>;

    /// Create a reference member named after each target the selector yields.
    fn create_reference_members<F, I>(
        &mut self,
        selector: F,
        create_association: bool,
    ) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> I,
        I: IntoIterator,
        I::Item: Into<TypeRef>;

    /// Create one named reference member on `class`.
    ///
    /// An explicit `association_name` always attaches an association, even
    /// when `create_association` is false.
    fn create_reference_member(
        &mut self,
        class: ClassId,
        name: &str,
        target: impl Into<TypeRef>,
        create_association: bool,
        association_name: Option<&str>,
    ) -> Result<&mut Self, BuildError>;

    /// Create a collection member on `class`; an association is always attached.
    fn create_collection_member(
        &mut self,
        class: ClassId,
        name: &str,
        target: impl Into<TypeRef>,
        association_name: Option<&str>,
    ) -> Result<&mut Self, BuildError>;

    /// Attach a default class options marker to every class the predicate accepts.
    fn create_default_class_options<F>(&mut self, predicate: F) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> bool;

    /// Set the base type of every class for which the selector yields one.
    fn set_inheritance<F, T>(&mut self, selector: F) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> Option<T>,
        T: Into<TypeRef>;
}

/// Classes created by one `create_classes` call.
///
/// Holds the builder mutably, so no further classes can be created while
/// the batch is alive.
pub struct ClassBatch<'a, S: MetadataStore> {
    pub(super) builder: &'a mut AssemblyBuilder<S>,
    pub(super) scope: Vec<usize>,
}

impl<S: MetadataStore> ClassBatch<'_, S> {
    /// Descriptor of a class in this session.
    pub fn class(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.builder.class(id)
    }

    /// The assembly as built so far.
    pub fn assembly(&self) -> &AssemblyDescriptor {
        &self.builder.assembly
    }
}

impl<S: MetadataStore> ClassHandler for ClassBatch<'_, S> {
    fn class_id(&self, name: &str) -> Option<ClassId> {
        self.scope
            .iter()
            .find(|&&index| self.builder.assembly.classes[index].name == name)
            .map(|&index| self.builder.class_id_at(index))
    }

    fn create_simple_members<K, F, I>(&mut self, kind: K, selector: F) -> Result<&mut Self, BuildError>
    where
        K: IntoDataType,
        F: Fn(&ClassDescriptor) -> I,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let data_type = kind.into_data_type()?;
        for &index in &self.scope {
            let names: Vec<String> = selector(&self.builder.assembly.classes[index])
                .into_iter()
                .map(Into::into)
                .collect();
            for name in names {
                self.builder.add_simple_member(index, name, data_type)?;
            }
        }
        Ok(self)
    }

    fn create_reference_members<F, I>(
        &mut self,
        selector: F,
        create_association: bool,
    ) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> I,
        I: IntoIterator,
        I::Item: Into<TypeRef>,
    {
        for &index in &self.scope {
            let targets: Vec<TypeRef> = selector(&self.builder.assembly.classes[index])
                .into_iter()
                .map(Into::into)
                .collect();
            for target in targets {
                let name = self.builder.target_simple_name(index, &target)?;
                self.builder
                    .add_reference_member(index, name, &target, create_association, None)?;
            }
        }
        Ok(self)
    }

    fn create_reference_member(
        &mut self,
        class: ClassId,
        name: &str,
        target: impl Into<TypeRef>,
        create_association: bool,
        association_name: Option<&str>,
    ) -> Result<&mut Self, BuildError> {
        let index = self.builder.class_index(class)?;
        self.builder.add_reference_member(
            index,
            name.to_string(),
            &target.into(),
            create_association,
            association_name,
        )?;
        Ok(self)
    }

    fn create_collection_member(
        &mut self,
        class: ClassId,
        name: &str,
        target: impl Into<TypeRef>,
        association_name: Option<&str>,
    ) -> Result<&mut Self, BuildError> {
        let index = self.builder.class_index(class)?;
        self.builder
            .add_collection_member(index, name.to_string(), &target.into(), association_name)?;
        Ok(self)
    }

    fn create_default_class_options<F>(&mut self, predicate: F) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> bool,
    {
        for &index in &self.scope {
            if predicate(&self.builder.assembly.classes[index]) {
                self.builder.add_default_class_options(index)?;
            }
        }
        Ok(self)
    }

    fn set_inheritance<F, T>(&mut self, selector: F) -> Result<&mut Self, BuildError>
    where
        F: Fn(&ClassDescriptor) -> Option<T>,
        T: Into<TypeRef>,
    {
        for &index in &self.scope {
            if let Some(base) = selector(&self.builder.assembly.classes[index]) {
                self.builder.set_base_type(index, &base.into())?;
            }
        }
        Ok(self)
    }
}
