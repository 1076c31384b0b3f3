//! OpenDigger 指标抓取: 请求、失败记录以及把时间序列拍平成行

pub mod client;
pub mod collect;
pub mod flatten;

pub use client::{FetchError, OpenDiggerClient};
pub use collect::{collect_hourly, collect_rows, fetch_leaderboard, CollectOutcome, HourlyOutcome};
