//! Worldforge command-line tool.
//!
//! Builds schema assemblies from JSON definitions and inspects metadata stores.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod definition;
mod formatter;

use clap::{Parser, Subcommand};
use definition::SchemaDefinition;
use formatter::OutputFormat;
use std::path::{Path, PathBuf};
use worldforge_core::store::MetadataStore;
use worldforge_core::{SledStore, StoreConfig};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "worldforge")]
#[command(version, about = "Worldforge schema metadata builder")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Store page cache size in MB
    #[arg(long, global = true, default_value_t = 64)]
    pub cache_mb: u64,

    /// Store data without compression
    #[arg(long, global = true)]
    pub no_compression: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build and commit an assembly from a JSON definition
    Build {
        /// Path to the definition file
        definition: PathBuf,

        /// Store directory (a temporary store is used when omitted)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
    /// List committed assemblies
    List {
        /// Store directory
        #[arg(short, long)]
        store: PathBuf,
    },
    /// Print one committed assembly
    Show {
        /// Assembly name
        assembly: String,

        /// Store directory
        #[arg(short, long)]
        store: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("worldforge=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let formatter = formatter::create_formatter(args.format);
    let open = |path: Option<&Path>| open_store(path, args.cache_mb, !args.no_compression);

    match args.command {
        Command::Build { definition, store } => {
            let definition = SchemaDefinition::load(&definition)?;
            let mut store = open(store.as_deref())?;
            let commit = definition.apply(&mut store)?;
            store.flush()?;
            tracing::info!(
                assembly = %commit.assembly.name,
                version = commit.version,
                "assembly built"
            );
            println!("{}", formatter.format_assembly(&commit.assembly));
        }
        Command::List { store } => {
            let store = open(Some(store.as_path()))?;
            let names = store.assembly_names()?;
            println!(
                "{}",
                formatter.format_assembly_list(&names, store.current_version())
            );
        }
        Command::Show { assembly, store } => {
            let store = open(Some(store.as_path()))?;
            let descriptor = store
                .load_assembly(&assembly)?
                .ok_or_else(|| worldforge_core::Error::NotFound(assembly.clone()))?;
            println!("{}", formatter.format_assembly(&descriptor));
        }
    }

    Ok(())
}

/// Open the sled store; writes are flushed explicitly after a build.
fn open_store(
    path: Option<&Path>,
    cache_mb: u64,
    compression: bool,
) -> Result<SledStore, worldforge_core::Error> {
    let config = match path {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::temporary(),
    }
    .with_cache_capacity(cache_mb * 1024 * 1024)
    .with_compression(compression)
    .with_flush_every_ms(None);
    SledStore::open(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_args() {
        let args = Args::parse_from([
            "worldforge",
            "build",
            "schema.json",
            "--store",
            "/tmp/meta",
            "--format",
            "json",
            "--cache-mb",
            "16",
        ]);

        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.cache_mb, 16);
        assert!(!args.no_compression);
        match args.command {
            Command::Build { definition, store } => {
                assert_eq!(definition, PathBuf::from("schema.json"));
                assert_eq!(store, Some(PathBuf::from("/tmp/meta")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_build_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("schema.json");
        std::fs::write(
            &definition,
            r#"{ "assembly": "Inventory", "batches": [{ "classes": ["Item"] }] }"#,
        )
        .unwrap();
        let store_dir = dir.path().join("store");

        run(Args::parse_from([
            "worldforge",
            "build",
            definition.to_str().unwrap(),
            "--store",
            store_dir.to_str().unwrap(),
        ]))
        .unwrap();

        let store = open_store(Some(store_dir.as_path()), 8, false).unwrap();
        assert_eq!(store.assembly_names().unwrap(), vec!["Inventory".to_string()]);
        assert_eq!(store.current_version(), 1);
        drop(store);

        let missing = run(Args::parse_from([
            "worldforge",
            "show",
            "Payroll",
            "--store",
            store_dir.to_str().unwrap(),
        ]));
        assert!(missing.is_err());
    }
}
