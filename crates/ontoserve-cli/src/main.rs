mod serve;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ontoserve_core::graph::GraphSnapshot;
use ontoserve_core::logging::init_logging;
use ontoserve_core::{Config, SurrealGraphStore};

#[derive(Parser)]
#[command(name = "ontoserve")]
#[command(about = "Read-only API for browsing and searching ontology class hierarchies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Config file (defaults to ./ontoserve.toml or the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// JSON snapshot to seed the store and search index from
        #[arg(long)]
        seed: Option<String>,
    },
    /// Load a JSON snapshot into a SurrealDB store
    Import {
        /// Snapshot file
        #[arg(long)]
        seed: PathBuf,
        /// Database directory
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            seed,
        } => {
            let config_path = config.or_else(Config::locate);
            let mut settings = match &config_path {
                Some(path) => Config::from_file(path)?,
                None => Config::load()?,
            };
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(seed) = seed {
                settings.store.seed_path = Some(seed);
            }

            init_logging(&settings.logging)?;
            serve::start_server(settings, config_path).await?;
        }
        Commands::Import { seed, db } => {
            let config = Config::load()?;
            init_logging(&config.logging)?;

            let db_path = db.unwrap_or_else(|| PathBuf::from(&config.store.db_path));
            let imported = import(&seed, &db_path, &config.store.iri_prefix).await?;
            println!(
                "Imported {} classes from {} into {}",
                imported,
                seed.display(),
                db_path.display()
            );
        }
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
    }

    Ok(())
}

async fn import(
    seed: &Path,
    db_path: &Path,
    iri_prefix: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let snapshot = GraphSnapshot::from_file(seed)?;
    let store = SurrealGraphStore::open(db_path, iri_prefix).await?;
    store.initialize_schema().await?;
    Ok(store.import_snapshot(&snapshot).await?)
}
