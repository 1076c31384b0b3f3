mod aggregate;
mod command;
mod config;
mod leaderboard;
mod manager;
mod normalize;
mod pass;
mod wordcloud;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crate::config::EvaluationContext;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 开源生态指标抓取、聚合与导出
#[derive(Debug, Parser)]
#[command(name = "evaluate", version)]
struct Cli {
    /// 配置文件路径 (不带扩展名, 按 toml 读取)
    #[arg(long, default_value = "evaluate/config")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// 抓取目录中每个仓库的全部指标, 导出扁平行
    Fetch,
    /// 按年份聚合 fetch 导出的 csv, 生成透视表
    Yearly,
    /// 计算类别健康度五维得分
    Health,
    /// 抓取排行榜并保留前 10 名
    Leaderboard,
    /// 抓取 24 小时活跃分布
    Hourly,
    /// 统计技术热点词云
    Wordcloud,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Fetch => "fetch",
            Command::Yearly => "yearly",
            Command::Health => "health",
            Command::Leaderboard => "leaderboard",
            Command::Hourly => "hourly",
            Command::Wordcloud => "wordcloud",
        }
    }
}

fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(false),
        )
        .init();
}

async fn dispatch(cmd: Command, ctx: &EvaluationContext) -> Result<()> {
    match cmd {
        Command::Fetch => command::fetch::run(ctx).await,
        Command::Yearly => command::yearly::run(ctx),
        Command::Health => command::health::run(ctx),
        Command::Leaderboard => command::leaderboard::run(ctx).await,
        Command::Hourly => command::hourly::run(ctx).await,
        Command::Wordcloud => command::wordcloud::run(ctx),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志记录器
    init_logger();

    let cli = Cli::parse();

    // 加载配置
    let ctx = EvaluationContext::load_config(&cli.config)?;
    info!(
        "config loaded - repositories= {}, metrics= {}, output= {}",
        ctx.catalog.len(),
        ctx.metrics.len(),
        ctx.output.dir
    );

    // 已写出的文件保留, 不回滚
    if let Err(e) = dispatch(cli.command, &ctx).await {
        error!("{} failed: {:#}", cli.command.name(), e);
        return Err(e);
    }

    info!("{} finished", cli.command.name());
    Ok(())
}
