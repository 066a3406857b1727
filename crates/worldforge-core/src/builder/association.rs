//! Association name resolution and consistency checks.

use crate::metadata::{AssemblyDescriptor, MemberDescriptor};
use std::fmt;

/// Effective association name: the explicit name, or the member's own name.
pub fn effective_association_name(member_name: &str, explicit: Option<&str>) -> String {
    explicit.unwrap_or(member_name).to_string()
}

/// A relation whose collection side and reference side disagree on the
/// association name, leaving an orphaned collection and foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationMismatch {
    /// Class owning the collection (the "one" side).
    pub one_class: String,
    /// Class owning the reference (the "many" side).
    pub many_class: String,
    /// Collection association names with no matching reference.
    pub collection_names: Vec<String>,
    /// Reference association names with no matching collection.
    pub reference_names: Vec<String>,
}

impl fmt::Display for AssociationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} collections [{}] do not pair with {} references [{}]",
            self.one_class,
            self.collection_names.join(", "),
            self.many_class,
            self.reference_names.join(", ")
        )
    }
}

/// Find every class pair whose two relation sides carry association names
/// that do not pair up.
///
/// Only pairs where both sides exist in the assembly are compared. A
/// collection with no reference member pointing back (or the reverse) is not
/// reported.
///
/// Within a pair, a mismatch needs unmatched names on both sides. Extra
/// collections or references whose names find no partner are silent while
/// the other side has no unmatched name left, so a second collection to the
/// same target with no inverse reference is not reported.
pub fn find_association_mismatches(assembly: &AssemblyDescriptor) -> Vec<AssociationMismatch> {
    let mut mismatches = Vec::new();

    for one in &assembly.classes {
        let one_full_name = one.full_name();

        let mut targets: Vec<&str> = Vec::new();
        for target in one.collection_members().filter_map(|m| m.target_full_name()) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }

        for target in targets {
            let Some(many) = assembly.class_by_full_name(target) else {
                continue;
            };

            let collection_names = association_names(one.collection_members(), target);
            let reference_names = association_names(many.reference_members(), &one_full_name);
            if reference_names.is_empty() {
                continue;
            }

            let unmatched_collections: Vec<String> = collection_names
                .iter()
                .filter(|name| !reference_names.contains(name))
                .cloned()
                .collect();
            let unmatched_references: Vec<String> = reference_names
                .iter()
                .filter(|name| !collection_names.contains(name))
                .cloned()
                .collect();

            if !unmatched_collections.is_empty() && !unmatched_references.is_empty() {
                mismatches.push(AssociationMismatch {
                    one_class: one_full_name.clone(),
                    many_class: many.full_name(),
                    collection_names: unmatched_collections,
                    reference_names: unmatched_references,
                });
            }
        }
    }

    mismatches
}

/// Association names of the relational `members` that target `target`.
fn association_names<'a>(
    members: impl Iterator<Item = &'a MemberDescriptor>,
    target: &str,
) -> Vec<String> {
    members
        .filter(|m| m.target_full_name() == Some(target))
        .filter_map(|m| m.association_name())
        .map(String::from)
        .collect()
}
