use serde::{Deserialize, Serialize};

// 排行榜接口返回结构: {"data": [{"item": {"name": ..}, "rank": .., "value": ..}]}
#[derive(Debug, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub data: Vec<LeaderboardItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardItem {
    pub item: ItemName,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub openrank: Option<f64>,
    #[serde(default)]
    pub activity: Option<f64>,
    #[serde(default)]
    pub rank_delta: Option<i64>,
    #[serde(default)]
    pub value_delta: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ItemName {
    pub name: String,
}

/// 排行榜条目, 用于排序和导出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_delta: Option<f64>,
}

impl LeaderboardEntry {
    /// 排序依据: value, 其次 openrank, 再次 activity, 都没有时按 0 处理
    pub fn sort_value(&self) -> f64 {
        self.value.or(self.openrank).or(self.activity).unwrap_or(0.0)
    }
}

impl From<LeaderboardItem> for LeaderboardEntry {
    fn from(item: LeaderboardItem) -> Self {
        Self {
            name: item.item.name,
            rank: item.rank.unwrap_or(0),
            value: item.value,
            openrank: item.openrank,
            activity: item.activity,
            rank_delta: item.rank_delta,
            value_delta: item.value_delta,
        }
    }
}
