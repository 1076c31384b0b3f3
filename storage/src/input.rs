use crate::error::InputError;
use crate::rows::REQUIRED_ROW_COLUMNS;
use model::FlatRow;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

// 只取 `rows`, 其余运行元数据忽略
#[derive(Debug, Deserialize)]
struct RowsDocument {
    rows: Vec<FlatRow>,
}

fn ensure_exists(path: &Path, producer: &str) -> Result<(), InputError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(InputError::Missing {
            path: path.to_path_buf(),
            producer: producer.to_owned(),
        })
    }
}

/// 读取此前导出的 `{rows: FlatRow[]}` json 文档
pub fn read_rows_json(path: &Path, producer: &str) -> Result<Vec<FlatRow>, InputError> {
    ensure_exists(path, producer)?;
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: RowsDocument = serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded {} rows from {}", doc.rows.len(), path.display());
    Ok(doc.rows)
}

/// 读取 csv 并按表头反序列化, 缺少 `required` 中任一列时报错
pub fn read_csv<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
    producer: &str,
) -> Result<Vec<T>, InputError> {
    ensure_exists(path, producer)?;
    let csv_err = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
            producer: producer.to_owned(),
        });
    }

    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result.map_err(csv_err)?);
    }
    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn read_rows_csv(path: &Path, producer: &str) -> Result<Vec<FlatRow>, InputError> {
    read_csv(path, &REQUIRED_ROW_COLUMNS, producer)
}
