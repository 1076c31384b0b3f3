use crate::command::{generated_at, save_workbook_blocking};
use crate::config::EvaluationContext;
use crate::leaderboard::{top_n, TOP_N};
use collector::{fetch_leaderboard, OpenDiggerClient};
use model::LeaderboardEntry;
use serde::Serialize;
use storage::csv_export::write_csv;
use storage::json_export::write_json;
use storage::{Cell, Table};
use tracing::{info, warn};

pub const LEADERBOARD_JSON: &str = "leaderboard_top10.json";
pub const LEADERBOARD_CSV: &str = "leaderboard_top10.csv";
pub const LEADERBOARD_XLSX: &str = "leaderboard_top10.xlsx";

const COLUMNS: [&str; 7] = [
    "board", "rank", "name", "value", "rankDelta", "valueDelta", "sortValue",
];

#[derive(Debug, Serialize)]
struct BoardResult {
    name: String,
    url: String,
    data: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct BoardFailure {
    name: String,
    url: String,
    reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardDocument<'a> {
    generated_at: String,
    boards: &'a [BoardResult],
    errors: &'a [BoardFailure],
}

fn push_entries(table: &mut Table, board: &str, entries: &[LeaderboardEntry]) {
    for e in entries {
        table.push_row(vec![
            Cell::from(board),
            Cell::from(e.rank as f64),
            Cell::from(e.name.as_str()),
            Cell::from(e.value),
            Cell::from(e.rank_delta.map(|d| d as f64)),
            Cell::from(e.value_delta),
            Cell::from(e.sort_value()),
        ]);
    }
}

pub async fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let client = OpenDiggerClient::new(&ctx.api.base_url, ctx.api.timeout())?;

    let mut boards = Vec::new();
    let mut errors = Vec::new();
    for board in &ctx.leaderboard.boards {
        match fetch_leaderboard(&client, &board.url).await {
            Ok(entries) => {
                info!("{}: {} entries", board.name, entries.len());
                boards.push(BoardResult {
                    name: board.name.clone(),
                    url: board.url.clone(),
                    data: top_n(entries, TOP_N),
                });
            }
            Err(e) => {
                warn!("{} ({}) failed: {}", board.name, board.url, e);
                errors.push(BoardFailure {
                    name: board.name.clone(),
                    url: board.url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let router = ctx.output.router();
    let document = LeaderboardDocument {
        generated_at: generated_at(),
        boards: &boards,
        errors: &errors,
    };
    write_json(&router.path_for(LEADERBOARD_JSON)?, &document)?;

    let mut all = Table::new("all", &COLUMNS);
    let mut sheets = Vec::new();
    for board in &boards {
        push_entries(&mut all, &board.name, &board.data);
        let mut sheet = Table::new(&board.name, &COLUMNS);
        push_entries(&mut sheet, &board.name, &board.data);
        sheets.push(sheet);
    }
    write_csv(&router.path_for(LEADERBOARD_CSV)?, &all)?;

    let mut tables = vec![all];
    tables.extend(sheets);
    save_workbook_blocking(
        router.path_for(LEADERBOARD_XLSX)?,
        tables,
        ctx.output.save_policy(),
    )
    .await?;
    Ok(())
}
