use crate::error::ExportError;
use crate::table::Table;
use std::fs;
use std::path::Path;
use tracing::info;

/// 标准逗号分隔, 只在值包含逗号、引号或换行时加引号
pub fn table_to_csv(table: &Table) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.render()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_csv(path: &Path, table: &Table) -> Result<(), ExportError> {
    let text = table_to_csv(table)?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("csv saved: {} ({} rows)", path.display(), table.len());
    Ok(())
}
