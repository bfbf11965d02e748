//! Loading request tables from disk

use super::RequestTable;
use crate::error::{AnacomusError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Load a request table from a CSV or JSON file.
///
/// The file must carry the `ip_address`, `timestamp`, `user_agent`,
/// `query_field` and `honeypot_field` columns; `true_label` is optional.
pub fn load_table(path: &Path) -> Result<RequestTable> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let df = match ext {
        "csv" => CsvReadOptions::default()
            .with_infer_schema_length(Some(1000))
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        "json" => JsonReader::new(File::open(path)?).finish()?,
        _ => {
            return Err(AnacomusError::InvalidInput(format!(
                "Unsupported file format: {}",
                ext
            )))
        }
    };

    info!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded request table");
    RequestTable::from_dataframe(&df)
}
