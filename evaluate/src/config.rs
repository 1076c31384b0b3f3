use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use model::RepoConfig;
use serde::Deserialize;
use std::time::Duration;
use storage::workbook::SavePolicy;
use storage::OutputRouter;

/// 上游指标接口配置
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub hourly_timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn hourly_timeout(&self) -> Duration {
        Duration::from_secs(self.hourly_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: String,
    pub save_attempts: u32,
    pub retry_delay_ms: u64,
}

impl OutputConfig {
    pub fn router(&self) -> OutputRouter {
        OutputRouter::new(&self.dir)
    }

    pub fn save_policy(&self) -> SavePolicy {
        SavePolicy {
            attempts: self.save_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub domestic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    pub country: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HourlyConfig {
    pub metric: String,
    pub fallback_metric: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaderboardConfig {
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordcloudConfig {
    pub input_csv: String,
    pub top_n: usize,
}

/// 运行上下文
#[derive(Debug, Deserialize, Clone)]
pub struct EvaluationContext {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub region: RegionConfig,
    pub health: HealthConfig,
    pub hourly: HourlyConfig,
    pub leaderboard: LeaderboardConfig,
    pub wordcloud: WordcloudConfig,
    pub metrics: Vec<String>,
    pub catalog: Vec<RepoConfig>,
}

impl EvaluationContext {
    pub fn load_config(config_path: &str) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(
                File::with_name(config_path)
                    .format(FileFormat::Toml)
                    .required(true),
            )
            .add_source(
                Environment::with_prefix("OPENGOV")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))
    }
}

/// 测试用上下文: 两个仓库 (一个国内, 一个国外), 输出写到 `out_dir`
#[cfg(test)]
pub(crate) fn test_context(base_url: &str, out_dir: &std::path::Path) -> EvaluationContext {
    use model::Platform;

    EvaluationContext {
        api: ApiConfig {
            base_url: base_url.to_owned(),
            timeout_secs: 5,
            hourly_timeout_secs: 5,
        },
        output: OutputConfig {
            dir: out_dir.join("output").to_string_lossy().into_owned(),
            save_attempts: 1,
            retry_delay_ms: 0,
        },
        region: RegionConfig {
            domestic: "CN".into(),
        },
        health: HealthConfig {
            country: "CN".into(),
        },
        hourly: HourlyConfig {
            metric: "active_dates_and_times".into(),
            fallback_metric: "activity".into(),
        },
        leaderboard: LeaderboardConfig {
            boards: vec![BoardConfig {
                name: "openrank".into(),
                url: format!("{}/leaderboards/openrank.json", base_url),
            }],
        },
        wordcloud: WordcloudConfig {
            input_csv: out_dir.join("output.csv").to_string_lossy().into_owned(),
            top_n: 15,
        },
        metrics: vec!["openrank".into(), "activity".into()],
        catalog: vec![
            RepoConfig {
                platform: Platform::Github,
                org: "apache".into(),
                repo: "doris".into(),
                country: Some("CN".into()),
                category: Some("database".into()),
                org_label: Some("Apache".into()),
            },
            RepoConfig {
                platform: Platform::Github,
                org: "pytorch".into(),
                repo: "pytorch".into(),
                country: Some("US".into()),
                category: Some("ai".into()),
                org_label: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;

    #[test]
    fn test_load_shipped_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config");
        let ctx = EvaluationContext::load_config(path).unwrap();
        assert_eq!(ctx.health.country, "CN");
        assert!(ctx.metrics.iter().any(|m| m == "openrank"));
        assert!(ctx.catalog.iter().any(|r| r.platform == Platform::Gitee));
        assert!(!ctx.leaderboard.boards.is_empty());
        assert_eq!(ctx.output.save_policy().attempts, 3);
    }

    #[test]
    fn test_load_missing_config_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent");
        assert!(EvaluationContext::load_config(path.to_str().unwrap()).is_err());
    }
}
