use crate::error::ExportError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn write_json<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), ExportError> {
    let text = serde_json::to_string_pretty(document)?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("json saved: {}", path.display());
    Ok(())
}
