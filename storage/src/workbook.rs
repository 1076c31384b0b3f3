use crate::error::ExportError;
use crate::output::timestamped_path;
use crate::table::{Cell, Table};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

// Excel sheet 名最长 31 个字符
const MAX_SHEET_NAME: usize = 31;

/// 工作簿被占用时的重试策略
#[derive(Debug, Clone, Copy)]
pub struct SavePolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for SavePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

fn sheet_name(raw: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    let base = if cleaned.trim().is_empty() {
        "Sheet".to_owned()
    } else {
        cleaned
    };

    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.to_lowercase()) {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        name = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    name
}

/// 每个 `Table` 一个 sheet
pub fn build_workbook(tables: &[Table]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let mut used = HashSet::new();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&table.name, &mut used))?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header.as_str())?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, col, s.as_str())?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, col, *n)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    Ok(workbook)
}

/// 保存工作簿. 目标文件被占用时先删除再重试, 重试用尽后改存为带时间戳的新文件名.
/// 返回实际写入的路径
pub fn save_workbook(
    path: &Path,
    tables: &[Table],
    policy: SavePolicy,
) -> Result<PathBuf, ExportError> {
    let mut workbook = build_workbook(tables)?;

    for attempt in 1..=policy.attempts {
        match workbook.save(path) {
            Ok(()) => {
                info!("excel saved: {} ({} sheets)", path.display(), tables.len());
                return Ok(path.to_path_buf());
            }
            Err(e) => {
                warn!(
                    "save {} failed (attempt {}/{}): {}",
                    path.display(),
                    attempt,
                    policy.attempts,
                    e
                );
                if path.exists() {
                    if let Err(e) = fs::remove_file(path) {
                        warn!("cannot remove {}: {}", path.display(), e);
                    }
                }
                if attempt < policy.attempts {
                    thread::sleep(policy.delay);
                }
            }
        }
    }

    let alternate = timestamped_path(path, &chrono::Local::now());
    workbook.save(&alternate)?;
    warn!(
        "{} is in use, saved to {} instead",
        path.display(),
        alternate.display()
    );
    Ok(alternate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Table> {
        let mut raw = Table::new("raw", &["repo", "value"]);
        raw.push_row(vec![Cell::from("a"), Cell::from(1.0)]);
        raw.push_row(vec![Cell::from("b"), Cell::Empty]);
        let pivot = Table::new("pivot/yearly", &["repo"]);
        vec![raw, pivot]
    }

    #[test]
    fn test_sheet_names_are_sanitized_and_unique() {
        let mut used = HashSet::new();
        assert_eq!(sheet_name("a/b:c", &mut used), "a_b_c");
        assert_eq!(sheet_name("A_B_C", &mut used), "A_B_C_2");
        let long = "x".repeat(40);
        assert_eq!(sheet_name(&long, &mut used).chars().count(), 31);
        assert_eq!(sheet_name("", &mut used), "Sheet");
    }

    #[test]
    fn test_save_workbook() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.xlsx");
        let written = save_workbook(&path, &sample(), SavePolicy::default()).unwrap();
        assert_eq!(written, path);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_save_workbook_falls_back_to_timestamped_name() {
        let tmp = tempfile::tempdir().unwrap();
        // 目标路径被一个目录占住, 既写不进去也删不掉
        let blocked = tmp.path().join("report.xlsx");
        fs::create_dir(&blocked).unwrap();

        let policy = SavePolicy {
            attempts: 2,
            delay: Duration::from_millis(0),
        };
        let written = save_workbook(&blocked, &sample(), policy).unwrap();
        assert_ne!(written, blocked);
        assert!(written.is_file());
        let name = written.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("report_"));
        assert!(name.ends_with(".xlsx"));
    }
}
