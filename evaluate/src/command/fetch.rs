use crate::command::{generated_at, save_workbook_blocking};
use crate::config::EvaluationContext;
use collector::{collect_rows, CollectOutcome, OpenDiggerClient};
use model::{FetchFailure, FlatRow, RepoConfig};
use serde::Serialize;
use storage::csv_export::write_csv;
use storage::json_export::write_json;
use storage::rows::flat_rows_table;
use storage::{Cell, Table};
use tracing::info;

pub const ROWS_JSON: &str = "metrics_rows.json";
pub const ROWS_CSV: &str = "metrics_rows.csv";
pub const ROWS_XLSX: &str = "metrics_rows.xlsx";

/// 一次抓取的完整记录
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunDocument<'a> {
    generated_at: String,
    catalog: &'a [RepoConfig],
    metrics: &'a [String],
    row_count: usize,
    rows: &'a [FlatRow],
    errors: &'a [FetchFailure],
}

fn errors_table(errors: &[FetchFailure]) -> Table {
    let mut table = Table::new("errors", &["platform", "org", "repo", "metric", "url", "reason"]);
    for e in errors {
        table.push_row(vec![
            Cell::from(e.platform.as_str()),
            Cell::from(e.org.as_str()),
            Cell::from(e.repo.as_str()),
            Cell::from(e.metric.as_str()),
            Cell::from(e.url.as_str()),
            Cell::from(e.reason.as_str()),
        ]);
    }
    table
}

pub async fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let client = OpenDiggerClient::new(&ctx.api.base_url, ctx.api.timeout())?;
    info!(
        "fetching {} metrics for {} repositories",
        ctx.metrics.len(),
        ctx.catalog.len()
    );

    let outcome = collect_rows(&client, &ctx.catalog, &ctx.metrics).await;
    info!(
        "fetch completed - rows= {}, errors= {}",
        outcome.rows.len(),
        outcome.errors.len()
    );
    let tables = export(ctx, &outcome)?;
    let path = ctx.output.router().path_for(ROWS_XLSX)?;
    save_workbook_blocking(path, tables, ctx.output.save_policy()).await?;
    Ok(())
}

/// 写出 json/csv, 返回待保存的工作簿 sheet
fn export(ctx: &EvaluationContext, outcome: &CollectOutcome) -> anyhow::Result<Vec<Table>> {
    let router = ctx.output.router();

    let document = RunDocument {
        generated_at: generated_at(),
        catalog: &ctx.catalog,
        metrics: &ctx.metrics,
        row_count: outcome.rows.len(),
        rows: &outcome.rows,
        errors: &outcome.errors,
    };
    write_json(&router.path_for(ROWS_JSON)?, &document)?;

    let raw = flat_rows_table("raw", &outcome.rows);
    write_csv(&router.path_for(ROWS_CSV)?, &raw)?;

    Ok(vec![raw, errors_table(&outcome.errors)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_context;
    use storage::input::{read_rows_csv, read_rows_json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_writes_all_artifacts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/github/apache/doris/openrank.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"2023":4.5,"2023-01":1.5,"2023-01-raw":"x"}"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(&server.uri(), tmp.path());
        run(&ctx).await.unwrap();

        let router = ctx.output.router();
        let from_json = read_rows_json(&router.existing(ROWS_JSON), "evaluate fetch").unwrap();
        let from_csv = read_rows_csv(&router.existing(ROWS_CSV), "evaluate fetch").unwrap();
        assert_eq!(from_json.len(), 2);
        assert_eq!(from_json.len(), from_csv.len());
        assert!(router.existing(ROWS_XLSX).is_file());

        let text = std::fs::read_to_string(router.existing(ROWS_JSON)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["rowCount"], 2);
        // 两个仓库 x 两个指标, 只有一个成功
        assert_eq!(doc["errors"].as_array().unwrap().len(), 3);
        assert!(doc["generatedAt"].is_string());
    }
}
