//! Recency, Frequency & Monetary (RFM) customer analytics
//!
//! One grouped pass over a polars transaction frame produces, per customer:
//! - recency: whole days between the reference date and the latest transaction
//! - frequency: number of DISTINCT transaction ids
//! - monetary: sum of ALL prices, duplicated transaction ids included
//!
//! The frequency/monetary asymmetry on duplicate transaction ids is intentional.

use crate::error::{Result, StatError};
use crate::frame::{id_column, id_keys, price_column, require_column, timestamp_column, IdKey};
use crate::timestamp::{from_epoch_micros, parse_timestamp, whole_days_between};
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Aggregate column names inside the grouped frame
const LATEST: &str = "__rfm_latest";
const FREQUENCY: &str = "__rfm_frequency";
const MONETARY: &str = "__rfm_monetary";

/// Names of the four input columns consumed by [`compute_rfm`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfmColumns {
    /// Customer identifier column (rows with a null id are ignored)
    pub user: String,
    /// Transaction date column, used for recency
    pub date: String,
    /// Transaction identifier column, used for frequency
    pub transaction: String,
    /// Transaction price column, used for monetary
    pub price: String,
}

impl Default for RfmColumns {
    fn default() -> Self {
        Self {
            user: "member_id".to_string(),
            date: "date".to_string(),
            transaction: "checkout_id".to_string(),
            price: "price".to_string(),
        }
    }
}

impl RfmColumns {
    /// All four names in input order
    pub fn names(&self) -> [&str; 4] {
        [
            self.user.as_str(),
            self.date.as_str(),
            self.transaction.as_str(),
            self.price.as_str(),
        ]
    }
}

/// RFM metrics for one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmRow {
    pub user_id: IdKey,
    /// Days since the latest transaction (negative if it is after the reference
    /// date); `None` only when every date of this customer is missing
    pub recency: Option<i64>,
    /// Count of distinct transaction ids
    pub frequency: usize,
    /// Sum of prices over all rows
    pub monetary: f64,
}

/// RFM result, one row per distinct non-null customer id, sorted by id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RfmTable {
    rows: Vec<RfmRow>,
}

impl RfmTable {
    pub fn rows(&self) -> &[RfmRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RfmRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a customer's row
    pub fn get(&self, user_id: &IdKey) -> Option<&RfmRow> {
        self.rows
            .binary_search_by(|row| row.user_id.cmp(user_id))
            .ok()
            .map(|index| &self.rows[index])
    }

    pub fn into_rows(self) -> Vec<RfmRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a RfmTable {
    type Item = &'a RfmRow;
    type IntoIter = std::slice::Iter<'a, RfmRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Compute RFM metrics relative to a reference date string
///
/// # Arguments
/// * `frame` - Transaction rows; must contain the four columns named in `columns`
/// * `reference_date` - Recency anchor, e.g. `"2016/04/01"` or `"2016-04-01"`
/// * `columns` - Input column names (see [`RfmColumns::default`])
///
/// # Errors
/// * `StatError::Schema` if a named column is missing or has an unusable type
/// * `StatError::Parse` if the reference date, a row's date, or a price cannot be converted
///
/// # Example
/// ```
/// use polars::prelude::*;
/// use rfm_oec::frame::IdKey;
/// use rfm_oec::rfm::{compute_rfm, RfmColumns};
///
/// let frame = df!(
///     "member_id" => [1i64, 1],
///     "date" => ["2016-03-30", "2016-03-25"],
///     "checkout_id" => [10i64, 11],
///     "price" => [5.0, 7.5]
/// )
/// .unwrap();
///
/// let rfm = compute_rfm(&frame, "2016/04/01", &RfmColumns::default()).unwrap();
/// let row = rfm.get(&IdKey::Int(1)).unwrap();
/// assert_eq!(row.recency, Some(2));
/// assert_eq!(row.frequency, 2);
/// assert_eq!(row.monetary, 12.5);
/// ```
pub fn compute_rfm(
    frame: &DataFrame,
    reference_date: &str,
    columns: &RfmColumns,
) -> Result<RfmTable> {
    // Schema problems are reported before a bad reference date
    for name in columns.names() {
        require_column(frame, name)?;
    }

    let reference = parse_timestamp(reference_date)
        .map_err(|e| StatError::Parse(format!("reference date: {}", e)))?;

    compute_rfm_at(frame, reference, columns)
}

/// Compute RFM metrics relative to an already-parsed reference timestamp
pub fn compute_rfm_at(
    frame: &DataFrame,
    reference: NaiveDateTime,
    columns: &RfmColumns,
) -> Result<RfmTable> {
    let user = columns.user.as_str();

    let projected = DataFrame::new(vec![
        id_column(require_column(frame, user)?)?,
        timestamp_column(require_column(frame, &columns.date)?)?,
        require_column(frame, &columns.transaction)?.clone(),
        price_column(require_column(frame, &columns.price)?)?,
    ])?;
    let dropped = projected.column(user)?.null_count();

    let grouped = projected
        .lazy()
        .filter(col(user).is_not_null())
        .group_by([col(user)])
        .agg([
            col(columns.date.as_str()).max().alias(LATEST),
            col(columns.transaction.as_str())
                .drop_nulls()
                .n_unique()
                .alias(FREQUENCY),
            col(columns.price.as_str()).sum().alias(MONETARY),
        ])
        .sort_by_exprs([col(user)], SortMultipleOptions::default())
        .collect()?;

    tracing::debug!(
        rows = frame.height(),
        dropped_null_user = dropped,
        users = grouped.height(),
        "computed RFM aggregates"
    );

    let users = id_keys(grouped.column(user)?)?;
    let latest = grouped.column(LATEST)?.cast(&DataType::Int64)?;
    let frequency = grouped.column(FREQUENCY)?.cast(&DataType::UInt64)?;
    let monetary = grouped.column(MONETARY)?.cast(&DataType::Float64)?;

    let rows = users
        .into_iter()
        .zip(latest.i64()?)
        .zip(frequency.u64()?)
        .zip(monetary.f64()?)
        .map(|(((user_id, latest), frequency), monetary)| {
            let user_id = user_id
                .ok_or_else(|| StatError::Frame("null user id after filtering".to_string()))?;
            let recency = latest
                .map(|micros| from_epoch_micros(micros).map(|ts| whole_days_between(reference, ts)))
                .transpose()?;
            Ok(RfmRow {
                user_id,
                recency,
                frequency: frequency.unwrap_or(0) as usize,
                monetary: monetary.unwrap_or(0.0),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RfmTable { rows })
}
