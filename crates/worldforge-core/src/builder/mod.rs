//! Fluent, phase-scoped schema builder.
//!
//! An [`AssemblyBuilder`] owns one uncommitted assembly. Creating classes
//! yields a [`ClassBatch`] scoped to exactly those classes; members,
//! inheritance and class options are declared through the [`ClassHandler`]
//! operations on that batch. Nothing is persisted until
//! [`AssemblyBuilder::commit`].

mod association;
mod config;
mod error;
mod handler;
mod inheritance;
mod member;
mod registry;

pub use association::{effective_association_name, find_association_mismatches, AssociationMismatch};
pub use config::BuilderConfig;
pub use error::{BuildError, NameScope};
pub use handler::{AssemblyBuilder, ClassBatch, ClassHandler, Commit, IntoDataType, TypeRef};
pub use registry::ClassId;
