use crate::error::ExportError;
use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

/// 按扩展名把输出文件分到 excel/ csv/ json/ 子目录
#[derive(Debug, Clone)]
pub struct OutputRouter {
    root: PathBuf,
}

impl OutputRouter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subdir_for(file_name: &str) -> Option<&'static str> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xls" => Some("excel"),
            "csv" => Some("csv"),
            "json" => Some("json"),
            _ => None,
        }
    }

    /// 目标路径, 目录不存在时创建
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        let dir = match Self::subdir_for(file_name) {
            Some(sub) => self.root.join(sub),
            None => self.root.clone(),
        };
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir.join(file_name))
    }

    /// 已导出的产物路径, 不创建目录, 给下游命令读取用
    pub fn existing(&self, file_name: &str) -> PathBuf {
        match Self::subdir_for(file_name) {
            Some(sub) => self.root.join(sub).join(file_name),
            None => self.root.join(file_name),
        }
    }
}

/// `name.xlsx` -> `name_20240102_030405.xlsx`
pub fn timestamped_path<Tz: TimeZone>(path: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = now.format("%Y%m%d_%H%M%S");
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(file_name)
}
