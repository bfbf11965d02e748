//! Request record tables
//!
//! Holds the simulated network-request records the analyses run on:
//! - [`RequestRecord`] / [`RequestTable`] row types
//! - Built-in six-row tables ([`TableVariant`])
//! - CSV / JSON loading ([`load_table`])
//! - Conversion to a polars `DataFrame` and to an `ndarray` feature matrix

mod builtin;
mod loader;

pub use builtin::TableVariant;
pub use loader::load_table;

use crate::error::{AnacomusError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const IP_ADDRESS: &str = "ip_address";
pub const TIMESTAMP: &str = "timestamp";
pub const USER_AGENT: &str = "user_agent";
pub const QUERY_FIELD: &str = "query_field";
pub const HONEYPOT_FIELD: &str = "honeypot_field";
pub const TRUE_LABEL: &str = "true_label";
pub const PREDICTED_LABEL: &str = "predicted_label";

/// The four numeric columns the detector is trained on
pub const FEATURE_COLUMNS: [&str; 4] = [TIMESTAMP, USER_AGENT, QUERY_FIELD, HONEYPOT_FIELD];

/// A single simulated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub ip_address: String,
    /// Seconds
    pub timestamp: i64,
    /// Encoded user agent
    pub user_agent: i64,
    /// Number of filled-in query fields
    pub query_field: i64,
    /// 1 when the hidden honeypot field was filled in
    pub honeypot_field: i64,
    /// Ground truth: 0 normal, 1 anomalous
    pub true_label: Option<i64>,
}

impl RequestRecord {
    pub fn new(
        ip_address: impl Into<String>,
        timestamp: i64,
        user_agent: i64,
        query_field: i64,
        honeypot_field: i64,
    ) -> Self {
        Self {
            ip_address: ip_address.into(),
            timestamp,
            user_agent,
            query_field,
            honeypot_field,
            true_label: None,
        }
    }

    pub fn with_true_label(mut self, label: i64) -> Self {
        self.true_label = Some(label);
        self
    }

    /// Numeric value of a named column, if the record has it
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            TIMESTAMP => Some(self.timestamp as f64),
            USER_AGENT => Some(self.user_agent as f64),
            QUERY_FIELD => Some(self.query_field as f64),
            HONEYPOT_FIELD => Some(self.honeypot_field as f64),
            TRUE_LABEL => self.true_label.map(|l| l as f64),
            _ => None,
        }
    }
}

/// Ordered set of request records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTable {
    records: Vec<RequestRecord>,
}

impl RequestTable {
    /// Build a table, requiring either every record or none to carry a label
    pub fn new(records: Vec<RequestRecord>) -> Result<Self> {
        if records.len() < 2 {
            return Err(AnacomusError::InvalidInput(format!(
                "a request table needs at least 2 rows, got {}",
                records.len()
            )));
        }

        let labelled = records.iter().filter(|r| r.true_label.is_some()).count();
        if labelled != 0 && labelled != records.len() {
            return Err(AnacomusError::DataError(format!(
                "{} of {} rows carry a {}; expected all or none",
                labelled,
                records.len(),
                TRUE_LABEL
            )));
        }

        Ok(Self { records })
    }

    /// One of the built-in six-row tables
    pub fn builtin(variant: TableVariant, with_labels: bool) -> Self {
        let mut records = variant.records();
        if !with_labels {
            for record in &mut records {
                record.true_label = None;
            }
        }
        Self { records }
    }

    pub fn records(&self) -> &[RequestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_labels(&self) -> bool {
        self.records.first().is_some_and(|r| r.true_label.is_some())
    }

    pub fn ip_addresses(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.ip_address.as_str()).collect()
    }

    /// Raw (unscaled) values of one numeric column
    pub fn column_values(&self, column: &str) -> Result<Vec<f64>> {
        self.records
            .iter()
            .map(|r| {
                r.value(column)
                    .ok_or_else(|| AnacomusError::FeatureNotFound(column.to_string()))
            })
            .collect()
    }

    /// Ground-truth labels, when the table carries them
    pub fn true_labels(&self) -> Option<Array1<i32>> {
        if !self.has_labels() {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(|r| r.true_label.unwrap_or(0) as i32)
                .collect(),
        )
    }

    /// Convert to a polars DataFrame with one column per field
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let ips: Vec<&str> = self.ip_addresses();
        let ts: Vec<i64> = self.records.iter().map(|r| r.timestamp).collect();
        let ua: Vec<i64> = self.records.iter().map(|r| r.user_agent).collect();
        let qf: Vec<i64> = self.records.iter().map(|r| r.query_field).collect();
        let hp: Vec<i64> = self.records.iter().map(|r| r.honeypot_field).collect();

        let mut columns: Vec<Column> = vec![
            Series::new(IP_ADDRESS.into(), ips).into(),
            Series::new(TIMESTAMP.into(), ts).into(),
            Series::new(USER_AGENT.into(), ua).into(),
            Series::new(QUERY_FIELD.into(), qf).into(),
            Series::new(HONEYPOT_FIELD.into(), hp).into(),
        ];

        if self.has_labels() {
            let labels: Vec<i64> = self
                .records
                .iter()
                .map(|r| r.true_label.unwrap_or(0))
                .collect();
            columns.push(Series::new(TRUE_LABEL.into(), labels).into());
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Build a table from a DataFrame; `true_label` is optional
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let ips: Vec<String> = df
            .column(IP_ADDRESS)
            .map_err(|_| AnacomusError::FeatureNotFound(IP_ADDRESS.to_string()))?
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(str::to_string).ok_or_else(|| {
                    AnacomusError::DataError(format!("null {} at row {}", IP_ADDRESS, row))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ts = int_column(df, TIMESTAMP)?;
        let ua = int_column(df, USER_AGENT)?;
        let qf = int_column(df, QUERY_FIELD)?;
        let hp = int_column(df, HONEYPOT_FIELD)?;
        let labels = if df.get_column_index(TRUE_LABEL).is_some() {
            Some(int_column(df, TRUE_LABEL)?)
        } else {
            None
        };

        let records = (0..df.height())
            .map(|i| RequestRecord {
                ip_address: ips[i].clone(),
                timestamp: ts[i],
                user_agent: ua[i],
                query_field: qf[i],
                honeypot_field: hp[i],
                true_label: labels.as_ref().map(|l| l[i]),
            })
            .collect();

        Self::new(records)
    }

    /// Extract named numeric columns into a row-major feature matrix
    pub fn feature_matrix(&self, columns: &[String]) -> Result<Array2<f64>> {
        let n_rows = self.records.len();
        let col_data: Vec<Vec<f64>> = columns
            .iter()
            .map(|name| self.column_values(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| {
            col_data[c][r]
        }))
    }
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let column = df
        .column(name)
        .map_err(|_| AnacomusError::FeatureNotFound(name.to_string()))?;

    // Whole-valued floats are accepted, fractional ones are not truncated
    if column.dtype().is_float() {
        let floats = column.cast(&DataType::Float64)?;
        let fractional = floats
            .f64()?
            .into_iter()
            .enumerate()
            .find(|(_, v)| matches!(v, Some(x) if x.fract() != 0.0 || !x.is_finite()));
        if let Some((row, Some(v))) = fractional {
            return Err(AnacomusError::DataError(format!(
                "{} at row {} is not an integer: {}",
                name, row, v
            )));
        }
    }

    let casted = column
        .strict_cast(&DataType::Int64)
        .map_err(|e| AnacomusError::DataError(e.to_string()))?;

    casted
        .i64()
        .map_err(|e| AnacomusError::DataError(e.to_string()))?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| AnacomusError::DataError(format!("null {} at row {}", name, row)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_scatter_table() {
        let table = RequestTable::builtin(TableVariant::Scatter, true);
        assert_eq!(table.len(), 6);
        assert!(table.has_labels());
        assert_eq!(table.records()[2].query_field, 4);
        assert_eq!(table.records()[5].ip_address, "192.168.5.7");
    }

    #[test]
    fn test_builtin_boxplot_table_without_labels() {
        let table = RequestTable::builtin(TableVariant::BoxPlot, false);
        assert!(!table.has_labels());
        assert!(table.true_labels().is_none());
        assert_eq!(table.records()[2].query_field, 14);
    }

    #[test]
    fn test_feature_matrix_is_row_major() {
        let table = RequestTable::builtin(TableVariant::Scatter, true);
        let x = table.feature_matrix(&features()).unwrap();

        assert_eq!(x.dim(), (6, 4));
        assert_eq!(x[[2, 0]], 3000.0);
        assert_eq!(x[[3, 1]], 2.0);
        assert_eq!(x[[4, 3]], 1.0);
    }

    #[test]
    fn test_unknown_column() {
        let table = RequestTable::builtin(TableVariant::Scatter, true);
        let err = table.feature_matrix(&["bytes".to_string()]).unwrap_err();
        assert!(matches!(err, AnacomusError::FeatureNotFound(_)));
    }

    #[test]
    fn test_dataframe_round_trip() {
        let table = RequestTable::builtin(TableVariant::BoxPlot, true);
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (6, 6));

        let back = RequestTable::from_dataframe(&df).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_unlabelled_dataframe_has_five_columns() {
        let table = RequestTable::builtin(TableVariant::BoxPlot, false);
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn test_mixed_labels_rejected() {
        let records = vec![
            RequestRecord::new("10.0.0.1", 1, 1, 1, 0).with_true_label(0),
            RequestRecord::new("10.0.0.2", 2, 1, 1, 0),
        ];
        assert!(matches!(
            RequestTable::new(records),
            Err(AnacomusError::DataError(_))
        ));
    }

    #[test]
    fn test_single_row_rejected() {
        let records = vec![RequestRecord::new("10.0.0.1", 1, 1, 1, 0)];
        assert!(RequestTable::new(records).is_err());
    }
}
