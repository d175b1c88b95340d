//! Table Builder CLI
//!
//! Raw play-by-play JSON directory → shot feature table (CSV)
//! Game id listing per season

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "table_builder")]
#[command(about = "Build shot feature tables from play-by-play JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build a feature table from a directory of <game_id>.json files
    Build {
        /// Directory holding the raw game files
        #[arg(long)]
        raw_dir: PathBuf,

        /// Output CSV file path
        #[arg(long)]
        out: PathBuf,

        /// Only these games (repeatable); default is every file in raw_dir
        #[arg(long = "game")]
        games: Vec<u64>,

        /// Only games of this season start year (e.g. 2022)
        #[arg(long)]
        season: Option<u32>,

        /// Comma-separated output columns; default is the model columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Extraction config YAML; falls back to SHOT_CONFIG_PATH, then defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verify the written table against its checksum
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// List game ids of a season
    Ids {
        /// Season start year (e.g. 2022)
        #[arg(long)]
        season: u32,

        /// Playoff ids instead of regular-season ids
        #[arg(long, default_value = "false")]
        playoffs: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            raw_dir,
            out,
            games,
            season,
            columns,
            config,
            verify,
            metadata,
        } => {
            let config = match config {
                Some(path) => shot_core::ExtractionConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => shot_core::ExtractionConfig::from_env()
                    .context("Failed to load config from environment")?,
            };

            println!("Building shot table...");
            println!("   Input:  {}", raw_dir.display());
            println!("   Output: {}", out.display());

            let options = table_builder::BuildOptions {
                game_ids: games,
                season,
                columns,
                config,
            };
            let meta = table_builder::build_table(&raw_dir, &out, &options)?;

            print_metadata(&meta);

            if verify {
                verify_table_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Ids { season, playoffs } => {
            let ids = if playoffs {
                shot_core::playoff_game_ids(season)
            } else {
                shot_core::regular_season_game_ids(season)?
            };
            for id in ids {
                println!("{id}");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &table_builder::BuildMetadata) {
    println!("\nTable built");
    println!("   Rows:            {}", meta.rows);
    println!("   Columns:         {}", meta.columns.join(","));
    println!("   Games processed: {}", meta.games_processed);
    println!("   Games failed:    {}", meta.games_failed);
    if !meta.unresolved_games.is_empty() {
        println!("   Unresolved:      {:?}", meta.unresolved_games);
    }
    println!("   Dropped plays:   {}", meta.dropped_plays);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_table_integrity(path: &Path, checksum: &str) -> Result<()> {
    println!("\nVerifying table integrity...");
    if table_builder::verify_table(path, checksum)? {
        println!("Table verification passed");
        Ok(())
    } else {
        anyhow::bail!("Table verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &table_builder::BuildMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\nMetadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("table_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
