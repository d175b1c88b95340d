//! Table Builder Library
//!
//! Directory of `<game_id>.json` play-by-play files → feature table → CSV
//! with a SHA256 checksum.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shot_core::game_ids::season_of;
use shot_core::{
    model_columns, BatchContext, DirectorySource, ExtractionConfig, GameId, Table, TableAssembler,
};
use std::fs;
use std::path::Path;
use tracing::warn;

/// What to read and which columns to keep.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Games to read; empty means every game file in the directory
    pub game_ids: Vec<GameId>,
    /// Keep only games of this season (start year)
    pub season: Option<u32>,
    /// Output columns in order; empty means the model columns
    pub columns: Vec<String>,
    pub config: ExtractionConfig,
}

impl BuildOptions {
    fn column_list(&self) -> Vec<&str> {
        if self.columns.is_empty() {
            model_columns().to_vec()
        } else {
            self.columns.iter().map(String::as_str).collect()
        }
    }
}

/// Build metadata, written next to the table on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// SHA256 of the CSV file (hex)
    pub checksum: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub games_processed: usize,
    pub games_failed: usize,
    pub unresolved_games: Vec<GameId>,
    pub dropped_plays: usize,
}

/// Summary of the batch behind a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub games_processed: usize,
    pub games_failed: usize,
    pub unresolved_games: Vec<GameId>,
    pub dropped_plays: usize,
}

/// Run the pipeline over a directory and assemble the table.
///
/// Rows are ordered by (game id, event id) so the same input always gives
/// the same table.
pub fn build_table_from_dir(raw_dir: &Path, options: &BuildOptions) -> Result<(Table, BatchSummary)> {
    let source = DirectorySource::new(raw_dir);

    // 1. Pick the games
    let mut ids = if options.game_ids.is_empty() {
        source
            .game_ids()
            .with_context(|| format!("Failed to list games in {}", raw_dir.display()))?
    } else {
        options.game_ids.clone()
    };
    if let Some(season) = options.season {
        ids.retain(|&id| season_of(id) == season);
    }

    // 2. Derive rows in parallel
    let mut ctx = BatchContext::new(options.config);
    let outcome = ctx.fetch_and_derive(&source, &ids);
    for failure in &outcome.failures {
        warn!("Skipped game {:?}: {}", failure.game_id, failure.error);
    }

    let mut rows = outcome.rows;
    rows.sort_by_key(|r| (r.game_id, r.event_id));

    // 3. Encode, project, fill
    let columns = options.column_list();
    let table = TableAssembler::new(options.config.encoding)
        .assemble(&rows, &columns)
        .context("Failed to assemble feature table")?;

    let mut unresolved_games = outcome.unresolved_games;
    unresolved_games.sort_unstable();

    Ok((
        table,
        BatchSummary {
            games_processed: outcome.games_processed,
            games_failed: outcome.failures.len(),
            unresolved_games,
            dropped_plays: outcome.dropped_plays,
        },
    ))
}

/// Write `table` as CSV with a header row and return the file's SHA256.
pub fn write_csv(table: &Table, out: &Path) -> Result<String> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("Failed to create CSV file: {}", out.display()))?;
    writer.write_record(table.column_names())?;
    for row in table.string_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    file_checksum(out)
}

fn file_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Build the table from `raw_dir` and write it to `out`.
///
/// # Arguments
///
/// * `raw_dir` - directory holding `<game_id>.json` files
/// * `out` - CSV output path
/// * `options` - game selection, columns and extraction config
pub fn build_table(raw_dir: &Path, out: &Path, options: &BuildOptions) -> Result<BuildMetadata> {
    let (table, summary) = build_table_from_dir(raw_dir, options)?;
    let checksum = write_csv(&table, out)?;

    Ok(BuildMetadata {
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        rows: table.n_rows(),
        columns: table.column_names().to_vec(),
        games_processed: summary.games_processed,
        games_failed: summary.games_failed,
        unresolved_games: summary.unresolved_games,
        dropped_plays: summary.dropped_plays,
    })
}

/// Check a written table against its checksum.
pub fn verify_table(path: &Path, expected_checksum: &str) -> Result<bool> {
    Ok(file_checksum(path)? == expected_checksum)
}
