use serde::{Deserialize, Serialize};
use std::fmt;

/// 代码托管平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Gitee,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Gitee => "gitee",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 仓库目录项, 由配置文件给出, 运行期间只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RepoConfig {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub org_label: Option<String>,
}

impl RepoConfig {
    /// `platform/org/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}/{}", self.platform, self.org, self.repo)
    }
}

/// 一次失败的抓取, 记录来源元组和请求地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
    pub metric: String,
    pub url: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::Gitee).unwrap(), "\"gitee\"");
        let p: Platform = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(p, Platform::Github);
    }

    #[test]
    fn test_repo_config_exports_camel_case() {
        let cfg = RepoConfig {
            platform: Platform::Github,
            org: "apache".into(),
            repo: "doris".into(),
            country: Some("CN".into()),
            category: Some("database".into()),
            org_label: Some("Apache".into()),
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["orgLabel"], "Apache");
        assert_eq!(cfg.full_name(), "github/apache/doris");
    }
}
