//! Builder configuration.

/// Options for opening an assembly builder.
#[derive(Debug, Clone, Default)]
pub struct BuilderConfig {
    /// Assembly name. None generates a unique name.
    pub assembly_name: Option<String>,

    /// Fully qualified names of types known outside the store.
    pub external_types: Vec<String>,

    /// Reject commits whose relations carry mismatched association names.
    pub strict_associations: bool,
}

impl BuilderConfig {
    /// Create a configuration with a fixed assembly name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            assembly_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the assembly name.
    pub fn with_assembly_name(mut self, name: impl Into<String>) -> Self {
        self.assembly_name = Some(name.into());
        self
    }

    /// Declare an external type.
    pub fn with_external_type(mut self, full_name: impl Into<String>) -> Self {
        self.external_types.push(full_name.into());
        self
    }

    /// Declare several external types.
    pub fn with_external_types(
        self,
        full_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        full_names
            .into_iter()
            .fold(self, |config, full_name| config.with_external_type(full_name))
    }

    /// Enable or disable association validation on commit.
    pub fn with_strict_associations(mut self, strict: bool) -> Self {
        self.strict_associations = strict;
        self
    }
}
