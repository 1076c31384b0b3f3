use crate::command::fetch::ROWS_JSON;
use crate::command::generated_at;
use crate::config::EvaluationContext;
use crate::manager::{EvaluationManager, HealthReport};
use crate::normalize::category_display_name;
use model::{CategoryHealthScore, Dimension};
use serde::Serialize;
use std::collections::BTreeMap;
use storage::csv_export::write_csv;
use storage::input::read_rows_json;
use storage::json_export::write_json;
use storage::workbook::save_workbook;
use storage::{Cell, Table};

pub const HEALTH_JSON: &str = "health_overview.json";
pub const HEALTH_CSV: &str = "health_overview.csv";
pub const HEALTH_XLSX: &str = "health_overview.xlsx";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryValue {
    dimension: Dimension,
    category: String,
    label: String,
    value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthDocument<'a> {
    generated_at: String,
    country: &'a str,
    dimensions: Vec<&'static str>,
    scores: &'a [CategoryHealthScore],
    category_values: Vec<CategoryValue>,
}

fn scores_table(scores: &[CategoryHealthScore]) -> Table {
    let mut table = Table::new("scores", &["dimension", "category", "score"]);
    for s in scores {
        table.push_row(vec![
            Cell::from(s.dimension.as_str()),
            Cell::from(s.category.as_str()),
            Cell::from(s.score),
        ]);
    }
    table
}

/// 类别 x 维度 宽表
fn overview_table(scores: &[CategoryHealthScore]) -> Table {
    let mut headers = vec!["category"];
    headers.extend(Dimension::ALL.iter().map(|d| d.as_str()));
    let mut table = Table::new("overview", &headers);

    let mut by_category: BTreeMap<&str, BTreeMap<Dimension, f64>> = BTreeMap::new();
    for s in scores {
        by_category
            .entry(s.category.as_str())
            .or_default()
            .insert(s.dimension, s.score);
    }
    for (category, dims) in by_category {
        let mut row = vec![Cell::from(category)];
        row.extend(Dimension::ALL.iter().map(|d| Cell::from(dims.get(d).copied())));
        table.push_row(row);
    }
    table
}

fn groups_table(report: &HealthReport) -> Table {
    let mut headers = vec!["repo", "category"];
    headers.extend(Dimension::ALL.iter().map(|d| d.as_str()));
    let mut table = Table::new("groups", &headers);
    for g in &report.groups {
        let mut row = vec![Cell::from(g.repo.as_str()), Cell::from(g.category.as_str())];
        row.extend(Dimension::ALL.iter().map(|d| Cell::from(g.values.get(d).copied())));
        table.push_row(row);
    }
    table
}

fn category_values(report: &HealthReport) -> Vec<CategoryValue> {
    report
        .category_values
        .iter()
        .flat_map(|(dimension, values)| {
            values.iter().map(move |(category, value)| CategoryValue {
                dimension: *dimension,
                category: category.clone(),
                label: category_display_name(category),
                value: *value,
            })
        })
        .collect()
}

pub fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let router = ctx.output.router();
    let rows = read_rows_json(&router.existing(ROWS_JSON), "evaluate fetch")?;

    let mut manager = EvaluationManager::new();
    manager.add_default_passes();
    let report = manager.run(&rows, &ctx.health.country);

    let values = category_values(&report);
    let mut raw = Table::new("category_raw", &["dimension", "category", "label", "value"]);
    for v in &values {
        raw.push_row(vec![
            Cell::from(v.dimension.as_str()),
            Cell::from(v.category.as_str()),
            Cell::from(v.label.as_str()),
            Cell::from(v.value),
        ]);
    }

    let document = HealthDocument {
        generated_at: generated_at(),
        country: &report.country,
        dimensions: Dimension::ALL.iter().map(|d| d.as_str()).collect(),
        scores: &report.scores,
        category_values: values,
    };
    write_json(&router.path_for(HEALTH_JSON)?, &document)?;

    let scores = scores_table(&report.scores);
    write_csv(&router.path_for(HEALTH_CSV)?, &scores)?;

    let tables = vec![
        overview_table(&report.scores),
        scores,
        raw,
        groups_table(&report),
    ];
    save_workbook(&router.path_for(HEALTH_XLSX)?, &tables, ctx.output.save_policy())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_context;
    use model::{FlatRow, Platform};

    fn row(repo: &str, category: &str, metric: &str, value: f64) -> FlatRow {
        FlatRow {
            platform: Platform::Github,
            org: "org".into(),
            repo: repo.into(),
            metric: metric.into(),
            time_key: "2024".into(),
            value,
            country: Some("CN".into()),
            category: Some(category.into()),
            org_label: None,
        }
    }

    #[test]
    fn test_overview_table_is_wide() {
        let scores = vec![
            CategoryHealthScore {
                dimension: Dimension::Impact,
                category: "数据库".into(),
                score: 6.0,
            },
            CategoryHealthScore {
                dimension: Dimension::Activity,
                category: "数据库".into(),
                score: 10.0,
            },
        ];
        let table = overview_table(&scores);
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][1], Cell::Number(10.0));
        assert_eq!(table.rows[0][2], Cell::Empty);
        assert_eq!(table.rows[0][3], Cell::Number(6.0));
    }

    #[test]
    fn test_health_exports_from_fetch_output() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context("http://127.0.0.1:9", tmp.path());
        let router = ctx.output.router();
        let rows = vec![
            row("a", "ai", "activity", 10.0),
            row("b", "database", "activity", 20.0),
        ];
        write_json(
            &router.path_for(ROWS_JSON).unwrap(),
            &serde_json::json!({ "rows": rows }),
        )
        .unwrap();

        run(&ctx).unwrap();

        let text = std::fs::read_to_string(router.existing(HEALTH_CSV)).unwrap();
        assert!(text.starts_with("dimension,category,score\n"));
        assert!(text.contains("activity,人工智能,6\n"));
        assert!(text.contains("activity,数据库,10\n"));
        assert!(text.contains("impact,数据库,8\n"));
        assert!(router.existing(HEALTH_XLSX).is_file());
    }

    #[test]
    fn test_health_without_fetch_output_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context("http://127.0.0.1:9", tmp.path());
        assert!(run(&ctx).is_err());
    }
}
