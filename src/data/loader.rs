//! CSV Data Loader Module
//! Handles dataset loading and record extraction using Polars.

use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset unavailable at {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse delimited data: {0}")]
    Parse(#[from] PolarsError),
    #[error("No data rows in dataset")]
    NoData,
    #[error("Loader thread exited without a result")]
    Interrupted,
}

/// One input row: raw cell values keyed by column name, plus the row index
/// assigned at load time.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: usize,
    pub fields: HashMap<String, String>,
}

/// Ordered header columns and the records read from one file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// Load a delimited dataset, keeping every cell as a raw string.
///
/// Schema inference is disabled so numeric interpretation happens only where
/// a consumer asks for it. Missing cells become empty strings.
pub fn load(path: &Path) -> Result<Dataset, LoaderError> {
    // A fetch failure (missing or unreadable file) is distinct from a parse
    // failure of well-located content.
    std::fs::metadata(path).map_err(|source| LoaderError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    if df.height() == 0 {
        return Err(LoaderError::NoData);
    }

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut fields = HashMap::with_capacity(columns.len());
        for col in df.get_columns() {
            let raw = match col.get(i) {
                Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
                _ => String::new(),
            };
            fields.insert(col.name().to_string(), raw);
        }
        records.push(Record { id: i, fields });
    }

    Ok(Dataset { columns, records })
}

/// One-shot handle to a load running on a worker thread.
pub struct LoadHandle {
    rx: Receiver<Result<Dataset, LoaderError>>,
}

impl LoadHandle {
    /// Block until the load completes. Not restartable; no cancellation.
    pub fn wait(self) -> Result<Dataset, LoaderError> {
        self.rx.recv().map_err(|_| LoaderError::Interrupted)?
    }
}

/// Run the load on a background thread and hand back a one-shot handle.
pub fn load_in_background(path: PathBuf) -> LoadHandle {
    let (tx, rx) = channel();
    thread::spawn(move || {
        let _ = tx.send(load(&path));
    });
    LoadHandle { rx }
}
