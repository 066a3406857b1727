//! Inheritance setter: base type assignment and cycle detection.

use super::error::BuildError;
use super::handler::{AssemblyBuilder, TypeRef};
use crate::store::MetadataStore;
use std::collections::HashSet;
use tracing::debug;

impl<S: MetadataStore> AssemblyBuilder<S> {
    /// Set the base type of the class at `class`. Members stay on their
    /// declaring class.
    pub(super) fn set_base_type(&mut self, class: usize, base: &TypeRef) -> Result<(), BuildError> {
        let base = self.resolve(class, base)?.full_name;
        let full_name = self.assembly.classes[class].full_name();

        if self.base_chain_reaches(&base, &full_name) {
            return Err(BuildError::CyclicInheritance {
                class: full_name,
                base,
            });
        }

        debug!(class = %full_name, base = %base, "Set base type");
        self.assembly.classes[class].base_type_full_name = Some(base);
        Ok(())
    }

    /// Whether following base types from `start` arrives at `target`.
    ///
    /// The chain ends at the first type that is not a class of this session.
    fn base_chain_reaches(&self, start: &str, target: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(start.to_string());

        while let Some(name) = current {
            if name == target {
                return true;
            }
            if !visited.insert(name.clone()) {
                return false;
            }
            current = self
                .assembly
                .class_by_full_name(&name)
                .and_then(|c| c.base_type_full_name.clone());
        }

        false
    }
}
