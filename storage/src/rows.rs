use crate::table::{Cell, Table};
use model::FlatRow;

/// 扁平行导出 csv 的列, 与 `FlatRow` 的 serde 字段名一致
pub const FLAT_ROW_HEADERS: [&str; 9] = [
    "platform", "org", "repo", "metric", "timeKey", "value", "country", "category", "orgLabel",
];

/// 读取扁平行 csv 时必须存在的列
pub const REQUIRED_ROW_COLUMNS: [&str; 6] =
    ["platform", "org", "repo", "metric", "timeKey", "value"];

pub fn flat_rows_table(name: &str, rows: &[FlatRow]) -> Table {
    let mut table = Table::new(name, &FLAT_ROW_HEADERS);
    for row in rows {
        table.push_row(vec![
            Cell::from(row.platform.as_str()),
            Cell::from(row.org.as_str()),
            Cell::from(row.repo.as_str()),
            Cell::from(row.metric.as_str()),
            Cell::from(row.time_key.as_str()),
            Cell::from(row.value),
            Cell::from(row.country.clone()),
            Cell::from(row.category.clone()),
            Cell::from(row.org_label.clone()),
        ]);
    }
    table
}
