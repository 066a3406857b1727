//! Core type definitions for metadata descriptors.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a metadata object by the store that created it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Kind of metadata object a store is asked to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// An assembly descriptor.
    Assembly,
    /// A class descriptor.
    Class,
    /// A scalar-valued member.
    SimpleMember,
    /// A many-to-one reference member.
    ReferenceMember,
    /// A one-to-many collection member.
    CollectionMember,
    /// An association attribute attached to a relational member.
    AssociationAttribute,
    /// A default class options marker attached to a class.
    DefaultClassOptionsAttribute,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetadataKind::Assembly => "assembly",
            MetadataKind::Class => "class",
            MetadataKind::SimpleMember => "simple member",
            MetadataKind::ReferenceMember => "reference member",
            MetadataKind::CollectionMember => "collection member",
            MetadataKind::AssociationAttribute => "association attribute",
            MetadataKind::DefaultClassOptionsAttribute => "default class options attribute",
        };
        f.write_str(name)
    }
}

/// Scalar storage types a simple member can hold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub enum DataType {
    /// Boolean value.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 8-bit integer.
    SByte,
    /// Single character.
    Char,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Single,
    /// 64-bit floating point.
    Double,
    /// Fixed-precision decimal.
    Decimal,
    /// Date and time.
    DateTime,
    /// Duration.
    TimeSpan,
    /// 128-bit identifier.
    Guid,
    /// UTF-8 string.
    String,
    /// Binary data.
    ByteArray,
}

impl DataType {
    /// All supported data types.
    pub const ALL: [DataType; 18] = [
        DataType::Boolean,
        DataType::Byte,
        DataType::SByte,
        DataType::Char,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::UInt16,
        DataType::UInt32,
        DataType::UInt64,
        DataType::Single,
        DataType::Double,
        DataType::Decimal,
        DataType::DateTime,
        DataType::TimeSpan,
        DataType::Guid,
        DataType::String,
        DataType::ByteArray,
    ];

    /// Canonical name of the data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Byte => "Byte",
            DataType::SByte => "SByte",
            DataType::Char => "Char",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::UInt16 => "UInt16",
            DataType::UInt32 => "UInt32",
            DataType::UInt64 => "UInt64",
            DataType::Single => "Single",
            DataType::Double => "Double",
            DataType::Decimal => "Decimal",
            DataType::DateTime => "DateTime",
            DataType::TimeSpan => "TimeSpan",
            DataType::Guid => "Guid",
            DataType::String => "String",
            DataType::ByteArray => "ByteArray",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name does not map to a supported data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataType(pub String);

impl fmt::Display for UnknownDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data type: {}", self.0)
    }
}

impl std::error::Error for UnknownDataType {}

impl FromStr for DataType {
    type Err = UnknownDataType;

    /// Parse a canonical name (`Int32`) or the matching Rust primitive (`i32`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(data_type) = DataType::ALL.iter().find(|t| t.as_str() == s) {
            return Ok(*data_type);
        }
        let data_type = match s {
            "bool" => DataType::Boolean,
            "u8" => DataType::Byte,
            "i8" => DataType::SByte,
            "char" => DataType::Char,
            "i16" => DataType::Int16,
            "i32" => DataType::Int32,
            "i64" => DataType::Int64,
            "u16" => DataType::UInt16,
            "u32" => DataType::UInt32,
            "u64" => DataType::UInt64,
            "f32" => DataType::Single,
            "f64" => DataType::Double,
            "Vec<u8>" => DataType::ByteArray,
            _ => return Err(UnknownDataType(s.to_string())),
        };
        Ok(data_type)
    }
}

/// Direction of a relational member. Members always describe the one-to-many
/// relation seen from the "many" side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub enum RelationType {
    /// One-to-many relation.
    #[default]
    OneToMany,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::OneToMany => write!(f, "one-to-many"),
        }
    }
}

/// Code template a descriptor is generated with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub enum TemplateKind {
    /// Persistent class template.
    Class,
    /// Member with a getter and a setter.
    ReadWriteMember,
    /// Member with a getter only (collections).
    ReadOnlyMember,
}

/// Reference to a type that is not created in the current builder session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerdeSerialize, SerdeDeserialize)]
pub struct ExternalType {
    full_name: String,
}

impl ExternalType {
    /// Create a reference from a fully qualified name (`Namespace.Type`).
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    /// Fully qualified name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Simple name: the segment after the last `.`.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.full_name)
    }
}

impl fmt::Display for ExternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
