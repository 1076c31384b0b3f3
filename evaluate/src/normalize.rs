use std::collections::BTreeMap;

pub const SCORE_MIN: f64 = 6.0;
pub const SCORE_MAX: f64 = 10.0;
// 所有类别取值相同时的固定分
pub const SCORE_MID: f64 = 8.0;

// 内部类别标签 -> 展示名称
const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("ai", "人工智能"),
    ("bigdata", "大数据"),
    ("blockchain", "区块链"),
    ("cloud", "云原生"),
    ("database", "数据库"),
    ("devtools", "开发工具"),
    ("frontend", "前端框架"),
    ("iot", "物联网"),
    ("middleware", "中间件"),
    ("os", "操作系统"),
];

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// 未登记的标签原样返回
pub fn category_display_name(tag: &str) -> String {
    CATEGORY_LABELS
        .iter()
        .find(|(k, _)| *k == tag)
        .map_or_else(|| tag.to_owned(), |(_, v)| v.to_string())
}

/// 把一组取值线性映射到 [6, 10], 保留两位小数; 最大最小相等时全部为 8
pub fn min_max_scale(values: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let min = values.values().copied().fold(f64::INFINITY, f64::min);
    let max = values.values().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|(k, v)| {
            let score = if min == max {
                SCORE_MID
            } else {
                round2(SCORE_MIN + (SCORE_MAX - SCORE_MIN) * (v - min) / (max - min))
            };
            (k.clone(), score)
        })
        .collect()
}
