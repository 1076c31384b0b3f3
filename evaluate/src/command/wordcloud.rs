use crate::command::generated_at;
use crate::config::EvaluationContext;
use crate::wordcloud::{count_topics, RepoTopics, TopicStat};
use serde::Serialize;
use std::path::Path;
use storage::csv_export::write_csv;
use storage::input::read_csv;
use storage::json_export::write_json;
use storage::workbook::save_workbook;
use storage::{Cell, Table};
use tracing::info;

pub const WORDCLOUD_JSON: &str = "tech_wordcloud_data.json";
pub const WORDCLOUD_CSV: &str = "tech_wordcloud_data.csv";
pub const WORDCLOUD_XLSX: &str = "tech_wordcloud_data.xlsx";

const REQUIRED_COLUMNS: [&str; 2] = ["repo_name", "topics"];
const RANKING_HEADERS: [&str; 5] = ["排名", "技术热点词", "出现次数", "涉及仓库数", "仓库列表"];
const ALL_SHEET: &str = "详细统计（全部）";
// 工作簿里每个词最多列出的仓库数
const MAX_LISTED_REPOS: usize = 10;

#[derive(Debug, Serialize)]
struct CloudItem<'a> {
    name: &'a str,
    value: u64,
    count: u64,
    repos: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloudStats {
    total_topics: usize,
    // 看板按这个键名读取
    #[serde(rename = "top15Topics")]
    top_topics: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloudDocument<'a> {
    generated_at: String,
    description: String,
    data: Vec<CloudItem<'a>>,
    stats: CloudStats,
}

fn ranking_table(name: &str, stats: &[TopicStat]) -> Table {
    let mut table = Table::new(name, &RANKING_HEADERS);
    for (idx, stat) in stats.iter().enumerate() {
        let listed: Vec<&str> = stat
            .repos
            .iter()
            .take(MAX_LISTED_REPOS)
            .map(String::as_str)
            .collect();
        table.push_row(vec![
            Cell::from((idx + 1) as f64),
            Cell::from(stat.topic.as_str()),
            Cell::from(stat.count as f64),
            Cell::from(stat.repos.len() as f64),
            Cell::from(listed.join(", ")),
        ]);
    }
    table
}

fn top_sheet_name(top_n: usize) -> String {
    format!("词云图数据（Top{}）", top_n)
}

pub fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let input = Path::new(&ctx.wordcloud.input_csv);
    let records: Vec<RepoTopics> =
        read_csv(input, &REQUIRED_COLUMNS, "repository export with repo_name and topics")?;

    let stats = count_topics(&records);
    let top_n = ctx.wordcloud.top_n.min(stats.len());
    let top = &stats[..top_n];
    info!("{} distinct topics, keeping top {}", stats.len(), top_n);
    for (idx, stat) in top.iter().enumerate() {
        info!(
            "{}. {}: {} (repos= {})",
            idx + 1,
            stat.topic,
            stat.count,
            stat.repos.len()
        );
    }

    let router = ctx.output.router();
    let document = CloudDocument {
        generated_at: generated_at(),
        description: format!(
            "热门技术热点词云图数据（前{}排名，按出现次数排序）",
            ctx.wordcloud.top_n
        ),
        data: top
            .iter()
            .map(|s| CloudItem {
                name: &s.topic,
                value: s.count,
                count: s.count,
                repos: &s.repos,
            })
            .collect(),
        stats: CloudStats {
            total_topics: stats.len(),
            top_topics: top.len(),
        },
    };
    write_json(&router.path_for(WORDCLOUD_JSON)?, &document)?;

    let mut cloud = Table::new("wordcloud", &["name", "value", "count", "repoCount"]);
    for s in top {
        cloud.push_row(vec![
            Cell::from(s.topic.as_str()),
            Cell::from(s.count as f64),
            Cell::from(s.count as f64),
            Cell::from(s.repos.len() as f64),
        ]);
    }
    write_csv(&router.path_for(WORDCLOUD_CSV)?, &cloud)?;

    let tables = vec![
        ranking_table(&top_sheet_name(ctx.wordcloud.top_n), top),
        ranking_table(ALL_SHEET, &stats),
    ];
    save_workbook(
        &router.path_for(WORDCLOUD_XLSX)?,
        &tables,
        ctx.output.save_policy(),
    )?;
    Ok(())
}
