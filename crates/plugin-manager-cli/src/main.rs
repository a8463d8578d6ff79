use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plugin_manager::{PluginManager, RegistryConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plugin-manager", about = "Inspect plugin class manifests")]
struct Args {
    /// Manifest file or folder to scan (repeatable)
    #[arg(long = "path", short = 'p')]
    paths: Vec<PathBuf>,

    /// Do not scan the install prefixes from the environment
    #[arg(long)]
    no_env: bool,

    /// Registry config file (defaults to the per-user config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of plain text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered classes
    List {
        /// Only classes deriving from this base class
        #[arg(long)]
        base: Option<String>,
    },
    /// Show everything known about a class
    Info { class: String },
    /// List libraries providing registered classes
    Libraries,
    /// List the manifest files that are scanned
    Paths,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::load_user()?,
    };
    config.plugin_xml_paths.extend(args.paths.iter().cloned());
    if args.no_env {
        config.load_environment_paths = false;
    }

    let manager = PluginManager::from_config(&config);

    match &args.command {
        Command::List { base } => {
            let classes = match base {
                Some(base) => manager.available_classes_of(base),
                None => manager.available_classes(),
            };
            print_lines(args.json, &classes)?;
        }
        Command::Info { class } => {
            let full_name = manager
                .full_class_name(class)
                .ok_or_else(|| anyhow::anyhow!("unknown class: {}", class))?;
            let Some(info) = manager.class_info(&full_name) else {
                anyhow::bail!("unknown class: {}", class);
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("class:       {}", info.full_class_name);
                println!("base class:  {}", info.base_class_name);
                println!("library:     {}", info.library_path);
                println!("singleton:   {}", info.is_singleton);
                if let Some(description) = &info.description {
                    println!("description: {}", description);
                }
                if !info.associated_classes.is_empty() {
                    println!("associated:  {}", info.associated_classes.join(", "));
                }
                println!("manifest:    {}", info.source_manifest_path.display());
            }
        }
        Command::Libraries => {
            let libraries: Vec<_> = manager.registered_libraries().into_iter().collect();
            print_lines(args.json, &libraries)?;
        }
        Command::Paths => {
            let paths: Vec<_> = manager
                .plugin_xml_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            print_lines(args.json, &paths)?;
        }
    }

    Ok(())
}

fn print_lines<T: Serialize + std::fmt::Display>(json: bool, items: &[T]) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", item);
        }
    }
    Ok(())
}
