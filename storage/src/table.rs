use std::collections::{BTreeMap, BTreeSet};

/// 表格单元格
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// csv 中的文本形式, 空单元格为空串
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Empty, Into::into)
    }
}

/// 形状一致的一组记录, 同时作为 csv 文件内容和工作簿中的一个 sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 宽表透视的输入: 实体 (若干列) x 指标, 某一年的值
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRecord {
    pub entity: Vec<String>,
    pub metric: String,
    pub year: i32,
    pub value: f64,
}

/// 每个 实体 x 指标 一行, 每个出现过的年份一列 (升序), 没有观测的年份留空.
/// 同一 (实体, 指标, 年份) 出现多次时以后出现的为准
pub fn pivot_by_year(name: &str, entity_headers: &[&str], records: &[PivotRecord]) -> Table {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let mut grid: BTreeMap<(Vec<String>, String), BTreeMap<i32, f64>> = BTreeMap::new();
    for r in records {
        grid.entry((r.entity.clone(), r.metric.clone()))
            .or_default()
            .insert(r.year, r.value);
    }

    let year_headers: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let mut headers: Vec<&str> = entity_headers.to_vec();
    headers.push("metric");
    headers.extend(year_headers.iter().map(String::as_str));

    let mut table = Table::new(name, &headers);
    for ((entity, metric), values) in grid {
        let mut row: Vec<Cell> = entity.into_iter().map(Cell::Text).collect();
        row.push(Cell::Text(metric));
        row.extend(years.iter().map(|y| Cell::from(values.get(y).copied())));
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(repo: &str, metric: &str, year: i32, value: f64) -> PivotRecord {
        PivotRecord {
            entity: vec!["github".into(), repo.into()],
            metric: metric.into(),
            year,
            value,
        }
    }

    #[test]
    fn test_pivot_blank_cells_and_sorted_years() {
        let records = vec![
            rec("a", "openrank", 2024, 3.0),
            rec("a", "openrank", 2022, 1.0),
            rec("b", "openrank", 2023, 2.0),
        ];
        let table = pivot_by_year("pivot", &["platform", "repo"], &records);
        assert_eq!(
            table.headers,
            vec!["platform", "repo", "metric", "2022", "2023", "2024"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][3], Cell::Number(1.0));
        assert_eq!(table.rows[0][4], Cell::Empty);
        assert_eq!(table.rows[0][5], Cell::Number(3.0));
        assert_eq!(table.rows[1][1], Cell::Text("b".into()));
        assert_eq!(table.rows[1][3], Cell::Empty);
        assert_eq!(table.rows[1][4], Cell::Number(2.0));
    }

    #[test]
    fn test_pivot_one_row_per_entity_metric() {
        let records = vec![
            rec("a", "openrank", 2024, 3.0),
            rec("a", "activity", 2024, 7.0),
        ];
        let table = pivot_by_year("pivot", &["platform", "repo"], &records);
        assert_eq!(table.len(), 2);
        // BTreeMap 排序: activity 在 openrank 之前
        assert_eq!(table.rows[0][2], Cell::Text("activity".into()));
    }

    #[test]
    fn test_cell_render() {
        assert_eq!(Cell::from(1.5).render(), "1.5");
        assert_eq!(Cell::from(None::<f64>).render(), "");
        assert_eq!(Cell::from("x").render(), "x");
    }
}
