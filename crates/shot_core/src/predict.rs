//! Scoring seam for a trained goal classifier.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::table::Table;

/// A trained shot classifier. Feature order is the column order of the
/// table it is given.
pub trait ShotClassifier {
    /// Predicted label (1 = goal) and goal probability for one row.
    fn predict(&self, features: &[f64]) -> (u8, f64);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: u8,
    pub probability: f64,
}

/// Score every row of a numeric table.
pub fn score_table<C: ShotClassifier + ?Sized>(
    classifier: &C,
    table: &Table,
) -> Result<Vec<Prediction>, TableError> {
    let matrix = table.to_matrix()?;
    Ok(matrix
        .iter()
        .map(|row| {
            let (label, probability) = classifier.predict(row);
            Prediction { label, probability }
        })
        .collect())
}
