//! Column adapters between caller-supplied polars frames and the RFM aggregation
//!
//! Loading (CSV, databases, ...) is the caller's job. These helpers only
//! coerce the four consumed columns to the types the grouped aggregation
//! expects: integer or string ids, microsecond datetimes and float prices.

use crate::error::{Result, StatError};
use crate::timestamp::{from_epoch_seconds, parse_timestamp, to_epoch_micros};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a customer in RFM output
///
/// A frame column holds a single type, so one result contains either integer
/// or text ids. Ordering follows the column's natural ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKey::Int(i) => write!(f, "{}", i),
            IdKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for IdKey {
    fn from(v: i64) -> Self {
        IdKey::Int(v)
    }
}

impl From<&str> for IdKey {
    fn from(v: &str) -> Self {
        IdKey::Text(v.to_string())
    }
}

fn datetime_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Microseconds, None)
}

/// Look up a column, reporting its absence as a schema error
pub fn require_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame
        .column(name)
        .map_err(|_| StatError::Schema(format!("missing column '{}'", name)))
}

/// Id column as `Int64` or `String`
pub fn id_column(column: &Column) -> Result<Column> {
    match column.dtype() {
        DataType::String => Ok(column.clone()),
        dtype if dtype.is_integer() => Ok(column.cast(&DataType::Int64)?),
        other => Err(StatError::Schema(format!(
            "column '{}' has type {}, expected integer or string ids",
            column.name(),
            other
        ))),
    }
}

/// Ids of an [`id_column`], `None` for nulls
pub fn id_keys(column: &Column) -> Result<Vec<Option<IdKey>>> {
    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|cell| cell.map(IdKey::from))
            .collect()),
        _ => {
            let ids = column.cast(&DataType::Int64)?;
            let keys = ids.i64()?.into_iter().map(|cell| cell.map(IdKey::Int)).collect();
            Ok(keys)
        }
    }
}

/// Date column as naive microsecond datetimes
///
/// Strings are parsed with [`parse_timestamp`], integers are epoch seconds,
/// and date/datetime columns without a time zone are cast directly.
pub fn timestamp_column(column: &Column) -> Result<Column> {
    let name = column.name().clone();

    let micros: Vec<Option<i64>> = match column.dtype() {
        DataType::Date | DataType::Datetime(_, None) => {
            return Ok(column.cast(&datetime_dtype())?);
        }
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.map(|s| parse_timestamp(s).map(to_epoch_micros))
                    .transpose()
                    .map_err(|e| cell_error(&name, row, e))
            })
            .collect::<Result<_>>()?,
        dtype if dtype.is_integer() => {
            let secs = column.cast(&DataType::Int64)?;
            let micros = secs
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.map(|s| from_epoch_seconds(s).map(to_epoch_micros))
                        .transpose()
                        .map_err(|e| cell_error(&name, row, e))
                })
                .collect::<Result<_>>()?;
            micros
        }
        DataType::Null => vec![None; column.len()],
        other => {
            return Err(StatError::Schema(format!(
                "column '{}' has type {}, expected dates",
                name, other
            )))
        }
    };

    Ok(Series::new(name, micros).cast(&datetime_dtype())?.into_column())
}

/// Price column as `Float64`; text cells are parsed as decimal numbers
pub fn price_column(column: &Column) -> Result<Column> {
    match column.dtype() {
        DataType::String => {
            let name = column.name().clone();
            let prices = column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.map(|s| {
                        s.trim().parse::<f64>().map_err(|_| {
                            cell_error(&name, row, StatError::Parse(format!("'{}' is not a number", s)))
                        })
                    })
                    .transpose()
                })
                .collect::<Result<Vec<Option<f64>>>>()?;
            Ok(Series::new(name, prices).into_column())
        }
        dtype if dtype.is_integer() || dtype.is_float() || *dtype == DataType::Null => {
            Ok(column.cast(&DataType::Float64)?)
        }
        other => Err(StatError::Schema(format!(
            "column '{}' has type {}, expected prices",
            column.name(),
            other
        ))),
    }
}

fn cell_error(column: &str, row: usize, err: StatError) -> StatError {
    match err {
        StatError::Parse(msg) => {
            StatError::Parse(format!("column '{}', row {}: {}", column, row, msg))
        }
        other => other,
    }
}
