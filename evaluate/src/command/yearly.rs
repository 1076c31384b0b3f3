use crate::aggregate::{group_by_year, time_averaged, YearAggregate};
use crate::command::fetch::ROWS_CSV;
use crate::config::EvaluationContext;
use model::FlatRow;
use storage::csv_export::write_csv;
use storage::input::read_rows_csv;
use storage::rows::flat_rows_table;
use storage::table::pivot_by_year;
use storage::workbook::save_workbook;
use storage::{Cell, PivotRecord, Table};
use tracing::info;

pub const YEARLY_CSV: &str = "metrics_yearly.csv";
pub const YEARLY_XLSX: &str = "metrics_yearly.xlsx";

const ENTITY_HEADERS: [&str; 3] = ["platform", "org", "repo"];

fn yearly_table(yearly: &[YearAggregate]) -> Table {
    let mut table = Table::new(
        "yearly",
        &["platform", "org", "repo", "metric", "year", "sum", "count", "average"],
    );
    for y in yearly {
        table.push_row(vec![
            Cell::from(y.repo.platform.as_str()),
            Cell::from(y.repo.org.as_str()),
            Cell::from(y.repo.repo.as_str()),
            Cell::from(y.metric.as_str()),
            Cell::from(y.year as f64),
            Cell::from(y.aggregate.sum),
            Cell::from(y.aggregate.count as f64),
            Cell::from(y.aggregate.average()),
        ]);
    }
    table
}

fn time_averaged_table(rows: &[FlatRow]) -> Table {
    let mut table = Table::new(
        "time_averaged",
        &["platform", "org", "repo", "metric", "periods", "average"],
    );
    for (repo, metrics) in time_averaged(rows) {
        for (metric, aggregate) in metrics.iter() {
            table.push_row(vec![
                Cell::from(repo.platform.as_str()),
                Cell::from(repo.org.as_str()),
                Cell::from(repo.repo.as_str()),
                Cell::from(metric.as_str()),
                Cell::from(aggregate.count as f64),
                Cell::from(aggregate.average()),
            ]);
        }
    }
    table
}

fn pivot_table(name: &str, rows: &[FlatRow]) -> Table {
    let records: Vec<PivotRecord> = group_by_year(rows)
        .into_iter()
        .map(|y| PivotRecord {
            entity: vec![
                y.repo.platform.to_string(),
                y.repo.org.clone(),
                y.repo.repo.clone(),
            ],
            metric: y.metric.clone(),
            year: y.year,
            value: y.aggregate.average(),
        })
        .collect();
    pivot_by_year(name, &ENTITY_HEADERS, &records)
}

pub fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let router = ctx.output.router();
    let rows = read_rows_csv(&router.existing(ROWS_CSV), "evaluate fetch")?;

    let yearly = yearly_table(&group_by_year(&rows));
    write_csv(&router.path_for(YEARLY_CSV)?, &yearly)?;

    let domestic_code = ctx.region.domestic.as_str();
    let (domestic, international): (Vec<FlatRow>, Vec<FlatRow>) = rows
        .iter()
        .cloned()
        .partition(|r| r.country.as_deref() == Some(domestic_code));
    info!(
        "yearly aggregation - rows= {}, domestic= {}, international= {}",
        rows.len(),
        domestic.len(),
        international.len()
    );

    let tables = vec![
        flat_rows_table("raw", &rows),
        yearly,
        time_averaged_table(&rows),
        pivot_table("pivot", &rows),
        pivot_table("pivot_domestic", &domestic),
        pivot_table("pivot_international", &international),
    ];
    save_workbook(&router.path_for(YEARLY_XLSX)?, &tables, ctx.output.save_policy())?;
    Ok(())
}
