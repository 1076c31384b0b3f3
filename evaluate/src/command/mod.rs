pub mod fetch;
pub mod health;
pub mod hourly;
pub mod leaderboard;
pub mod wordcloud;
pub mod yearly;

use std::path::PathBuf;
use storage::workbook::{save_workbook, SavePolicy};
use storage::Table;

/// 导出文档里的生成时间
pub fn generated_at() -> String {
    chrono::Local::now().to_rfc3339()
}

/// 在 async 命令里保存工作簿. 重试间隔会阻塞线程, 放到 blocking 线程池执行
pub async fn save_workbook_blocking(
    path: PathBuf,
    tables: Vec<Table>,
    policy: SavePolicy,
) -> anyhow::Result<PathBuf> {
    let written =
        tokio::task::spawn_blocking(move || save_workbook(&path, &tables, policy)).await??;
    Ok(written)
}
