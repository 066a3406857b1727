//! JSON schema definitions replayed through the builder.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use worldforge_core::builder::{AssemblyBuilder, BuildError, BuilderConfig, ClassHandler};
use worldforge_core::metadata::ExternalType;
use worldforge_core::store::MetadataStore;
use worldforge_core::Commit;

/// Errors while loading or applying a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The definition file could not be read.
    #[error("cannot read definition: {0}")]
    Io(#[from] std::io::Error),

    /// The definition is not valid JSON for this format.
    #[error("invalid definition: {0}")]
    Parse(#[from] serde_json::Error),

    /// A member names a class outside its batch.
    #[error("class {class} is not part of batch {batch}")]
    ClassNotInBatch {
        /// The class name.
        class: String,
        /// Index of the batch.
        batch: usize,
    },

    /// The builder rejected the definition.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A complete assembly definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDefinition {
    /// Assembly name; generated when absent.
    pub assembly: Option<String>,
    /// Types known outside the store.
    #[serde(default)]
    pub external_types: Vec<String>,
    /// Reject mismatched association names on commit.
    #[serde(default)]
    pub strict_associations: bool,
    /// Class batches in creation order.
    pub batches: Vec<BatchDefinition>,
}

/// Classes created together and the members declared on them.
///
/// A batch without classes declares further members on the previous batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDefinition {
    /// Class names.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Types known outside the store, available from this batch on.
    #[serde(default)]
    pub external_types: Vec<String>,
    /// Simple members grouped by data type.
    #[serde(default)]
    pub simple_members: Vec<SimpleMembersDefinition>,
    /// Reference members.
    #[serde(default)]
    pub references: Vec<ReferenceDefinition>,
    /// Collection members.
    #[serde(default)]
    pub collections: Vec<CollectionDefinition>,
    /// Classes receiving default class options.
    #[serde(default)]
    pub default_options: Vec<String>,
    /// Base type per class name.
    #[serde(default)]
    pub inheritance: BTreeMap<String, String>,
}

/// Simple members of one data type.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleMembersDefinition {
    /// Data type name (`String`, `Int32`, ...).
    pub kind: String,
    /// Member names per class name.
    pub members: BTreeMap<String, Vec<String>>,
}

/// A reference member.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceDefinition {
    /// Owning class.
    pub class: String,
    /// Member name; defaults to the target's simple name.
    pub name: Option<String>,
    /// Target class name or fully qualified external type.
    pub target: String,
    /// Attach an association attribute.
    #[serde(default)]
    pub association: bool,
    /// Explicit association name; implies an association.
    pub association_name: Option<String>,
}

/// A collection member.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDefinition {
    /// Owning class.
    pub class: String,
    /// Member name.
    pub name: String,
    /// Element class name or fully qualified external type.
    pub target: String,
    /// Explicit association name.
    pub association: Option<String>,
}

impl SchemaDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a definition from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, DefinitionError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    fn builder_config(&self) -> BuilderConfig {
        let config = BuilderConfig::default()
            .with_external_types(self.external_types.iter().cloned())
            .with_strict_associations(self.strict_associations);
        match &self.assembly {
            Some(name) => config.with_assembly_name(name.clone()),
            None => config,
        }
    }

    /// Replay the definition through a builder and commit it.
    pub fn apply<S: MetadataStore>(&self, store: S) -> Result<Commit, DefinitionError> {
        let mut builder = AssemblyBuilder::open_with_config(store, self.builder_config())?;
        for (index, batch) in self.batches.iter().enumerate() {
            apply_batch(&mut builder, index, batch)?;
        }
        Ok(builder.commit()?)
    }
}

fn apply_batch<S: MetadataStore>(
    builder: &mut AssemblyBuilder<S>,
    index: usize,
    definition: &BatchDefinition,
) -> Result<(), DefinitionError> {
    let assembly = builder.name().to_string();
    for full_name in &definition.external_types {
        builder.register_external_type(full_name.clone());
    }
    let mut batch = if definition.classes.is_empty() {
        builder.last_batch()
    } else {
        builder.create_classes(definition.classes.iter().cloned())?
    };

    for group in &definition.simple_members {
        batch.create_simple_members(group.kind.as_str(), |c| {
            group.members.get(&c.name).cloned().unwrap_or_default()
        })?;
    }

    for reference in &definition.references {
        let class = batch
            .class_id(&reference.class)
            .ok_or_else(|| DefinitionError::ClassNotInBatch {
                class: reference.class.clone(),
                batch: index,
            })?;
        let target = target_ref(batch.assembly(), &assembly, &reference.target);
        match (&reference.name, &reference.association_name) {
            (None, None) => {
                batch.create_reference_members(
                    |c| (c.name == reference.class).then(|| target.clone()),
                    reference.association,
                )?;
            }
            (name, association_name) => {
                let name = name.clone().unwrap_or_else(|| target.name().to_string());
                batch.create_reference_member(
                    class,
                    &name,
                    target,
                    reference.association,
                    association_name.as_deref(),
                )?;
            }
        }
    }

    for collection in &definition.collections {
        let class = batch
            .class_id(&collection.class)
            .ok_or_else(|| DefinitionError::ClassNotInBatch {
                class: collection.class.clone(),
                batch: index,
            })?;
        let target = target_ref(batch.assembly(), &assembly, &collection.target);
        batch.create_collection_member(
            class,
            &collection.name,
            target,
            collection.association.as_deref(),
        )?;
    }

    if !definition.default_options.is_empty() {
        batch.create_default_class_options(|c| definition.default_options.contains(&c.name))?;
    }

    if !definition.inheritance.is_empty() {
        let bases: BTreeMap<&str, ExternalType> = definition
            .inheritance
            .iter()
            .map(|(class, base)| (class.as_str(), target_ref(batch.assembly(), &assembly, base)))
            .collect();
        batch.set_inheritance(|c| bases.get(c.name.as_str()).cloned())?;
    }

    Ok(())
}

/// Class names of the assembly resolve to their full name; anything else is
/// taken as a fully qualified external type.
fn target_ref(
    current: &worldforge_core::AssemblyDescriptor,
    assembly: &str,
    target: &str,
) -> ExternalType {
    if current.has_class(target) {
        ExternalType::new(format!("{assembly}.{target}"))
    } else {
        ExternalType::new(target)
    }
}
