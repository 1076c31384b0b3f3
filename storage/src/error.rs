use std::path::PathBuf;
use thiserror::Error;

/// 上游产物缺失或格式不对, 属于致命错误
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file {} not found, it is produced by `{producer}`", .path.display())]
    Missing { path: PathBuf, producer: String },
    #[error("input file {} is missing columns [{}], regenerate it with `{producer}`", .path.display(), .columns.join(", "))]
    MissingColumns {
        path: PathBuf,
        columns: Vec<String>,
        producer: String,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed csv in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("malformed json in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
