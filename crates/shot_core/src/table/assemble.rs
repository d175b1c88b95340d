//! # Table Assembly
//!
//! Folds feature rows into an encoded [`Table`].
//!
//! ## Steps
//! 1. Encode: label, categorical codes (ordinal or one-hot), mirrored
//!    coordinates. Null and unseen categories take the `other` code. The
//!    raw event type and raw coordinates are not emitted
//! 2. Project onto the caller's column list, in the caller's order
//! 3. Fill nulls: numeric columns with the mean, categorical and text
//!    columns with the most frequent value (smallest on ties)

use std::collections::BTreeMap;

use tracing::debug;

use super::encoding::{
    canonical_coordinates, category_tables, one_hot_column_name, CategoryTable, EncodingConfig,
    EncodingMode,
};
use super::{Column, Table};
use crate::analysis::FeatureRow;
use crate::error::TableError;

/// Columns consumed by the serving model.
pub fn model_columns() -> &'static [&'static str] {
    &[
        "game_id",
        "event_id",
        "distance_from_net",
        "angle_from_net",
        "label",
        "empty_net",
    ]
}

fn numeric(rows: &[FeatureRow], f: impl Fn(&FeatureRow) -> Option<f64>) -> Column {
    Column::Numeric(rows.iter().map(f).collect())
}

fn categorical(rows: &[FeatureRow], f: impl Fn(&FeatureRow) -> Option<i64>) -> Column {
    Column::Categorical(rows.iter().map(f).collect())
}

fn text(rows: &[FeatureRow], f: impl Fn(&FeatureRow) -> Option<String>) -> Column {
    Column::Text(rows.iter().map(f).collect())
}

fn as_code(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

/// Encodes feature rows with a fixed [`EncodingConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAssembler {
    pub encoding: EncodingConfig,
}

impl TableAssembler {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self { encoding }
    }

    /// Every encoded column, nulls left in place.
    pub fn encode(&self, rows: &[FeatureRow]) -> Result<Table, TableError> {
        let tables = category_tables();
        let mut table = Table::new();

        table.push_column("game_id", categorical(rows, |r| Some(as_code(r.game_id))))?;
        table.push_column("season", categorical(rows, |r| r.season.map(as_code)))?;
        table.push_column("event_id", categorical(rows, |r| Some(as_code(r.event_id))))?;
        table.push_column("period_number", categorical(rows, |r| Some(i64::from(r.period_number))))?;
        table.push_column("time_in_period", numeric(rows, |r| Some(f64::from(r.time_in_period))))?;
        table.push_column("owner_team_id", categorical(rows, |r| r.owner_team_id.map(as_code)))?;
        table.push_column("home_team_id", categorical(rows, |r| Some(as_code(r.home_team_id))))?;
        table.push_column("away_team_id", categorical(rows, |r| Some(as_code(r.away_team_id))))?;
        table.push_column("shooter_id", categorical(rows, |r| r.shooter_id.map(as_code)))?;
        table.push_column("goalie_id", categorical(rows, |r| r.goalie_id.map(as_code)))?;
        table.push_column("situation_code", text(rows, |r| r.situation_code.clone()))?;
        table.push_column(
            "home_defending_side",
            text(rows, |r| r.home_defending_side.map(|s| s.as_str().to_string())),
        )?;

        let coords: Vec<[Option<f64>; 4]> = rows
            .iter()
            .map(|r| {
                if self.encoding.mirror_coordinates {
                    canonical_coordinates(r)
                } else {
                    [r.x_coord, r.y_coord, r.last_x, r.last_y]
                }
            })
            .collect();
        for (i, name) in ["current_x", "current_y", "prev_x", "prev_y"].into_iter().enumerate() {
            table.push_column(name, Column::Numeric(coords.iter().map(|c| c[i]).collect()))?;
        }

        self.push_category(&mut table, rows, "shot_type", &tables.shot_type, self.encoding.shot_type, |r| {
            r.shot_type.clone()
        })?;
        self.push_category(&mut table, rows, "zone_code", &tables.zone_code, self.encoding.zone_code, |r| {
            r.zone_code.map(|z| z.code().to_string())
        })?;
        self.push_category(
            &mut table,
            rows,
            "last_event_type",
            &tables.last_event_type,
            self.encoding.last_event_type,
            |r| r.last_event_type.map(|k| k.as_str().to_string()),
        )?;

        table.push_column(
            "time_since_last_event",
            numeric(rows, |r| r.time_since_last_event.map(f64::from)),
        )?;
        table.push_column("distance_from_last_event", numeric(rows, |r| r.distance_from_last_event))?;
        table.push_column("distance_from_net", numeric(rows, |r| r.distance_from_net))?;
        table.push_column("angle_from_net", numeric(rows, |r| r.angle_from_net))?;
        table.push_column("is_rebound", categorical(rows, |r| r.is_rebound.map(i64::from)))?;
        table.push_column("angle_change", numeric(rows, |r| r.angle_change))?;
        table.push_column("speed", numeric(rows, |r| r.speed))?;
        table.push_column("empty_net", categorical(rows, |r| Some(i64::from(r.empty_net))))?;
        table.push_column("flagged", categorical(rows, |r| Some(i64::from(r.flagged))))?;
        table.push_column("label", categorical(rows, |r| Some(i64::from(r.label))))?;

        debug!("Encoded {} rows into {} columns", table.n_rows(), table.n_columns());
        Ok(table)
    }

    fn push_category(
        &self,
        table: &mut Table,
        rows: &[FeatureRow],
        feature: &str,
        codes: &CategoryTable,
        mode: EncodingMode,
        value: impl Fn(&FeatureRow) -> Option<String>,
    ) -> Result<(), TableError> {
        let values: Vec<Option<String>> = rows.iter().map(value).collect();

        match mode {
            EncodingMode::Ordinal => table.push_column(
                feature,
                Column::Categorical(values.iter().map(|v| Some(codes.code_of(v.as_deref()))).collect()),
            ),
            EncodingMode::OneHot => {
                for bucket in codes.bucket_names() {
                    let column = values
                        .iter()
                        .map(|v| Some(i64::from(codes.bucket_of(v.as_deref()) == bucket)))
                        .collect();
                    table.push_column(one_hot_column_name(feature, bucket), Column::Categorical(column))?;
                }
                Ok(())
            }
        }
    }

    /// Encode, project onto `columns`, fill missing values.
    pub fn assemble(&self, rows: &[FeatureRow], columns: &[&str]) -> Result<Table, TableError> {
        let encoded = self.encode(rows)?;
        let projected = encoded.select(columns)?;
        fill_missing(projected)
    }
}

/// Assemble with the default encoding.
pub fn assemble_table(rows: &[FeatureRow], columns: &[&str]) -> Result<Table, TableError> {
    TableAssembler::default().assemble(rows, columns)
}

fn mode_of<T: Ord + Clone>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    // ascending key order, so the first maximum is the smallest value
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v)
}

/// Replace nulls column by column.
///
/// A column with nulls and no value to fill from is an
/// [`TableError::UnrecoverableColumn`].
pub fn fill_missing(mut table: Table) -> Result<Table, TableError> {
    for (name, column) in table.columns_mut() {
        if column.null_count() == 0 {
            continue;
        }
        let unrecoverable = || TableError::UnrecoverableColumn {
            column: name.to_string(),
        };

        match column {
            Column::Numeric(values) => {
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                if present.is_empty() {
                    return Err(unrecoverable());
                }
                let mean = present.iter().sum::<f64>() / present.len() as f64;
                values.iter_mut().filter(|v| v.is_none()).for_each(|v| *v = Some(mean));
            }
            Column::Categorical(values) => {
                let mode = mode_of(values.iter().flatten().copied()).ok_or_else(unrecoverable)?;
                values.iter_mut().filter(|v| v.is_none()).for_each(|v| *v = Some(mode));
            }
            Column::Text(values) => {
                let mode = mode_of(values.iter().flatten().cloned()).ok_or_else(unrecoverable)?;
                values
                    .iter_mut()
                    .filter(|v| v.is_none())
                    .for_each(|v| *v = Some(mode.clone()));
            }
        }
        debug!("Filled nulls in column '{}'", name);
    }
    Ok(table)
}
