pub mod catalog;
pub mod health;
pub mod metric;
pub mod opendigger;

pub use catalog::{FetchFailure, Platform, RepoConfig};
pub use health::{CategoryHealthScore, Dimension};
pub use metric::{extract_year, FlatRow, HourlyProfile, HourlySource, MetricAggregate};
pub use opendigger::LeaderboardEntry;
