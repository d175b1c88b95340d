//! # Feature Table
//!
//! Column-oriented table produced from feature rows.
//!
//! - `encoding` - embedded category tables, labels, mirroring
//! - `assemble` - rows to encoded table, projection, missing-value fill
//! - `split` - seeded stratified train/test split

pub mod assemble;
pub mod encoding;
pub mod split;

pub use assemble::{assemble_table, fill_missing, model_columns, TableAssembler};
pub use encoding::{
    category_tables, one_hot_column_name, CategoryCode, CategoryTable, CategoryTables,
    EncodingConfig, EncodingMode,
};
pub use split::{stratified_split, TrainTestSplit};

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single column. Numeric nulls are filled with the mean, categorical
/// and text nulls with the most frequent value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Text(_))
    }

    /// Cell as a float; text cells and nulls give `None`.
    pub fn value_f64(&self, row: usize) -> Option<f64> {
        match self {
            Column::Numeric(v) => v.get(row).copied().flatten(),
            Column::Categorical(v) => v.get(row).copied().flatten().map(|x| x as f64),
            Column::Text(_) => None,
        }
    }

    /// Cell rendered for CSV output; nulls are empty strings.
    pub fn cell_string(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            Column::Categorical(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            Column::Text(v) => v.get(row).cloned().flatten(),
        }
        .unwrap_or_default()
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => Column::Categorical(indices.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// Named columns of equal length, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), TableError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.n_rows,
                found: column.len(),
            });
        }

        self.n_rows = column.len();
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter_mut())
    }

    /// New table with exactly `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let mut out = Table::new();
        for &name in names {
            let column = self
                .column(name)
                .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
            out.push_column(name, column.clone())?;
        }
        if out.columns.is_empty() {
            out.n_rows = self.n_rows;
        }
        Ok(out)
    }

    /// New table with the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    /// Dense row-major matrix. Nulls become NaN.
    pub fn to_matrix(&self) -> Result<Vec<Vec<f64>>, TableError> {
        if let Some((name, _)) = self.columns().find(|(_, c)| !c.is_numeric()) {
            return Err(TableError::NonNumericColumn(name.to_string()));
        }

        Ok((0..self.n_rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.value_f64(row).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect())
    }

    /// Rows rendered as strings, for CSV writers.
    pub fn string_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.n_rows).map(move |row| self.columns.iter().map(|c| c.cell_string(row)).collect())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
