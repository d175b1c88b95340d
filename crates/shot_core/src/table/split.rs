//! Seeded stratified train/test split on the `label` column.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::Table;
use crate::error::TableError;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Table,
    pub test: Table,
}

/// Split `table` so each label keeps the same share in both halves.
///
/// Per label, `round(count * test_frac)` rows go to the test half. Row order
/// inside each half follows the input table. The same seed always yields
/// the same split.
pub fn stratified_split(table: &Table, test_frac: f64, seed: u64) -> Result<TrainTestSplit, TableError> {
    if !(test_frac > 0.0 && test_frac < 1.0) {
        return Err(TableError::InvalidSplit(format!(
            "test_frac must be in (0, 1), got {test_frac}"
        )));
    }
    let labels = table
        .column("label")
        .ok_or_else(|| TableError::UnknownColumn("label".to_string()))?;

    let mut by_label: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for row in 0..table.n_rows() {
        let label = labels
            .value_f64(row)
            .ok_or_else(|| TableError::InvalidSplit(format!("row {row} has no label")))?;
        by_label.entry(label as i64).or_default().push(row);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut rows) in by_label {
        rows.shuffle(&mut rng);
        let n_test = (rows.len() as f64 * test_frac).round() as usize;
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();

    Ok(TrainTestSplit {
        train: table.take(&train),
        test: table.take(&test),
    })
}
