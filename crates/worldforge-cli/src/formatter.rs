//! Output formatters for assemblies and store listings.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use worldforge_core::{AssemblyDescriptor, ClassDescriptor, MemberDescriptor, MemberKind};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format one assembly with its classes and members.
    fn format_assembly(&self, assembly: &AssemblyDescriptor) -> String;

    /// Format the names of the assemblies in a store at commit `version`.
    fn format_assembly_list(&self, names: &[String], version: u64) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_assembly(&self, assembly: &AssemblyDescriptor) -> String {
        let mut output = format!("Assembly {} ({} classes)", assembly.name, assembly.classes.len());
        for class in &assembly.classes {
            output.push_str("\n\n");
            output.push_str(&format_class_as_table(class));
        }
        output
    }

    fn format_assembly_list(&self, names: &[String], version: u64) -> String {
        if names.is_empty() {
            return "No assemblies".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec![Cell::new("Assembly")]);
        for name in names {
            table.add_row(vec![Cell::new(name)]);
        }
        format!("{}\nStore version {}", table, version)
    }
}

fn format_class_as_table(class: &ClassDescriptor) -> String {
    let mut heading = class.full_name();
    if let Some(base) = &class.base_type_full_name {
        heading.push_str(&format!(" : {}", base));
    }
    let options = class.default_class_options_count();
    if options > 0 {
        heading.push_str(&format!(" [default options x{}]", options));
    }

    if class.members.is_empty() {
        return format!("{}\n(no members)", heading);
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Member"),
        Cell::new("Kind"),
        Cell::new("Type"),
        Cell::new("Relation"),
        Cell::new("Association"),
    ]);
    for member in &class.members {
        table.add_row(vec![
            Cell::new(&member.name),
            Cell::new(member_kind(member)),
            Cell::new(member_type(member)),
            Cell::new(
                member
                    .relation_type()
                    .map(|relation| relation.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(member.association_name().unwrap_or("")),
        ]);
    }

    format!("{}\n{}", heading, table)
}

fn member_kind(member: &MemberDescriptor) -> &'static str {
    match member.kind {
        MemberKind::Simple { .. } => "simple",
        MemberKind::Reference { .. } => "reference",
        MemberKind::Collection { .. } => "collection",
    }
}

fn member_type(member: &MemberDescriptor) -> String {
    match &member.kind {
        MemberKind::Simple { data_type } => data_type.to_string(),
        MemberKind::Reference {
            reference_type_full_name,
            ..
        } => reference_type_full_name.clone(),
        MemberKind::Collection {
            collection_type_full_name,
            ..
        } => format!("[{}]", collection_type_full_name),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_assembly(&self, assembly: &AssemblyDescriptor) -> String {
        serde_json::to_string_pretty(assembly)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_assembly_list(&self, names: &[String], version: u64) -> String {
        serde_json::to_string_pretty(&serde_json::json!({
            "assemblies": names,
            "version": version,
        }))
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
