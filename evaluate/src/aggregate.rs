use model::{FlatRow, MetricAggregate, Platform};
use std::collections::BTreeMap;

/// 一个分组键下各指标的累计值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMetrics {
    metrics: BTreeMap<String, MetricAggregate>,
}

impl GroupMetrics {
    pub fn fold(&mut self, metric: &str, value: f64) {
        self.metrics
            .entry(metric.to_owned())
            .or_default()
            .fold(value);
    }

    pub fn get(&self, metric: &str) -> MetricAggregate {
        self.metrics.get(metric).copied().unwrap_or_default()
    }

    pub fn sum(&self, metric: &str) -> f64 {
        self.get(metric).sum
    }

    pub fn avg(&self, metric: &str) -> f64 {
        self.get(metric).average()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricAggregate)> {
        self.metrics.iter()
    }
}

/// 键 -> 指标累计值, 每次运行一个实例
#[derive(Debug, Clone)]
pub struct Aggregator<K: Ord> {
    groups: BTreeMap<K, GroupMetrics>,
}

impl<K: Ord> Default for Aggregator<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Aggregator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取分组, 不存在时创建
    pub fn entry(&mut self, key: K) -> &mut GroupMetrics {
        self.groups.entry(key).or_default()
    }

    pub fn fold(&mut self, key: K, metric: &str, value: f64) {
        self.entry(key).fold(metric, value);
    }

    pub fn into_groups(self) -> BTreeMap<K, GroupMetrics> {
        self.groups
    }
}

/// (仓库, 类别) 分组键, 仓库以 `platform/org/repo` 标识
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepoCategoryKey {
    pub repo: String,
    pub category: String,
}

/// 只保留 country 等于给定代码且带类别的行, 按 (仓库, 类别) 分组
pub fn group_by_repo_category(
    rows: &[FlatRow],
    country: &str,
) -> BTreeMap<RepoCategoryKey, GroupMetrics> {
    let mut aggregator = Aggregator::new();
    for row in rows {
        if row.country.as_deref() != Some(country) {
            continue;
        }
        let Some(category) = row.category.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let key = RepoCategoryKey {
            repo: format!("{}/{}/{}", row.platform, row.org, row.repo),
            category: category.to_owned(),
        };
        aggregator.fold(key, &row.metric, row.value);
    }
    aggregator.into_groups()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepoKey {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
}

impl From<&FlatRow> for RepoKey {
    fn from(row: &FlatRow) -> Self {
        Self {
            platform: row.platform,
            org: row.org.clone(),
            repo: row.repo.clone(),
        }
    }
}

/// (platform, org, repo, metric, year) 的聚合结果
#[derive(Debug, Clone, PartialEq)]
pub struct YearAggregate {
    pub repo: RepoKey,
    pub metric: String,
    pub year: i32,
    pub aggregate: MetricAggregate,
}

/// 按年份分组, 取不到年份的行不参与
pub fn group_by_year(rows: &[FlatRow]) -> Vec<YearAggregate> {
    let mut aggregator: Aggregator<(RepoKey, i32)> = Aggregator::new();
    for row in rows {
        if let Some(year) = row.year() {
            aggregator.fold((RepoKey::from(row), year), &row.metric, row.value);
        }
    }

    let mut out = Vec::new();
    for ((repo, year), metrics) in aggregator.into_groups() {
        for (metric, aggregate) in metrics.iter() {
            out.push(YearAggregate {
                repo: repo.clone(),
                metric: metric.clone(),
                year,
                aggregate: *aggregate,
            });
        }
    }
    // (platform, org, repo, metric, year) 顺序
    out.sort_by(|a, b| {
        (&a.repo, &a.metric, a.year).cmp(&(&b.repo, &b.metric, b.year))
    });
    out
}

/// 每个 (仓库, 指标) 在全部时间段上的均值
pub fn time_averaged(rows: &[FlatRow]) -> BTreeMap<RepoKey, GroupMetrics> {
    let mut aggregator = Aggregator::new();
    for row in rows {
        aggregator.fold(RepoKey::from(row), &row.metric, row.value);
    }
    aggregator.into_groups()
}
