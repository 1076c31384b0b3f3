use crate::catalog::{Platform, RepoConfig};
use serde::{Deserialize, Serialize};

/// 单个仓库、单个指标、单个时间段的一条观测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRow {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
    pub metric: String,
    pub time_key: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_label: Option<String>,
}

impl FlatRow {
    pub fn new(target: &RepoConfig, metric: &str, time_key: &str, value: f64) -> Self {
        Self {
            platform: target.platform,
            org: target.org.clone(),
            repo: target.repo.clone(),
            metric: metric.to_owned(),
            time_key: time_key.to_owned(),
            value,
            country: target.country.clone(),
            category: target.category.clone(),
            org_label: target.org_label.clone(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        extract_year(&self.time_key)
    }
}

/// 取时间键开头的 4 位年份, 例如 `2024-08` `2024Q3` 都得到 2024
pub fn extract_year(time_key: &str) -> Option<i32> {
    let head = time_key.get(..4)?;
    if head.bytes().all(|b| b.is_ascii_digit()) {
        head.parse().ok()
    } else {
        None
    }
}

/// 某个分组键下单个指标的累计值
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricAggregate {
    pub sum: f64,
    pub count: u64,
}

impl MetricAggregate {
    pub fn fold(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// 空分组的均值定义为 0
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourlySource {
    Measured,
    // 由年度/月度总量平均分摊得到, 不是真实分布
    Estimated,
}

/// 24 小时活跃度分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyProfile {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
    pub counts: [f64; 24],
    pub source: HourlySource,
}

impl HourlyProfile {
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// 每小时占全天总量的百分比, 总量为 0 时全部为 0
    pub fn percentages(&self) -> [f64; 24] {
        let total = self.total();
        let mut shares = [0.0; 24];
        if total > 0.0 {
            for (share, count) in shares.iter_mut().zip(self.counts.iter()) {
                *share = count / total * 100.0;
            }
        }
        shares
    }
}
