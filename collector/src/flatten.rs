use model::{extract_year, FlatRow, RepoConfig};
use serde_json::Value;

/// 把 `timeKey -> value` 映射拍平成行, 非数值叶子直接丢弃
pub fn flatten_metric(target: &RepoConfig, metric: &str, body: &Value) -> Vec<FlatRow> {
    let Some(map) = body.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(time_key, value)| {
            value
                .as_f64()
                .map(|v| FlatRow::new(target, metric, time_key, v))
        })
        .collect()
}

/// 把 7x24 的小时桶 (下标 `(day-1)*24 + hour`) 按小时求和成 24 个桶.
/// 也接受 `period -> [168]` 的映射, 先在各时间段上累加.
/// 没有任何数值时返回 None
pub fn fold_hourly(body: &Value) -> Option<[f64; 24]> {
    let mut hours = [0.0; 24];
    let mut seen = false;
    let mut fold_array = |arr: &Vec<Value>| {
        for (idx, v) in arr.iter().enumerate() {
            if let Some(n) = v.as_f64() {
                hours[idx % 24] += n;
                seen = true;
            }
        }
    };
    match body {
        Value::Array(arr) => fold_array(arr),
        Value::Object(map) => {
            for arr in map.values().filter_map(Value::as_array) {
                fold_array(arr);
            }
        }
        _ => {}
    }
    seen.then_some(hours)
}

/// 没有小时级数据时, 用年度活跃度总量平均分到 24 小时.
/// 只是近似值, 不代表真实分布
pub fn estimate_hourly(activity: &Value) -> Option<[f64; 24]> {
    let map = activity.as_object()?;
    let numeric: Vec<(&String, f64)> = map
        .iter()
        .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
        .collect();
    if numeric.is_empty() {
        return None;
    }
    let yearly: Vec<f64> = numeric
        .iter()
        .filter(|(k, _)| k.len() == 4 && extract_year(k).is_some())
        .map(|(_, n)| *n)
        .collect();
    let total: f64 = if yearly.is_empty() {
        numeric.iter().map(|(_, n)| n).sum()
    } else {
        yearly.iter().sum()
    };
    Some([total / 24.0; 24])
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;
    use serde_json::json;

    fn target() -> RepoConfig {
        RepoConfig {
            platform: Platform::Gitee,
            org: "openeuler".into(),
            repo: "kernel".into(),
            country: Some("CN".into()),
            category: Some("os".into()),
            org_label: Some("openEuler".into()),
        }
    }

    #[test]
    fn test_flatten_keeps_numeric_leaves_only() {
        let body = json!({
            "2023": 10,
            "2023-01": 1.5,
            "2023-02": "n/a",
            "2023-03": null,
            "2023-04": {"avg": 3},
            "2023-05": [1, 2]
        });
        let mut rows = flatten_metric(&target(), "activity", &body);
        rows.sort_by(|a, b| a.time_key.cmp(&b.time_key));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time_key, "2023");
        assert_eq!(rows[0].value, 10.0);
        assert_eq!(rows[1].value, 1.5);
        assert_eq!(rows[1].org_label.as_deref(), Some("openEuler"));
    }

    #[test]
    fn test_flatten_non_object_yields_nothing() {
        assert!(flatten_metric(&target(), "activity", &json!([1, 2, 3])).is_empty());
        assert!(flatten_metric(&target(), "activity", &json!(null)).is_empty());
    }

    #[test]
    fn test_fold_hourly_sums_across_days() {
        let arr: Vec<u32> = (0..168).map(|i| if i % 24 == 9 { 2 } else { 0 }).collect();
        let hours = fold_hourly(&json!(arr)).unwrap();
        assert_eq!(hours[9], 14.0);
        assert_eq!(hours.iter().sum::<f64>(), 14.0);
    }

    #[test]
    fn test_fold_hourly_from_period_map() {
        let mut day = vec![0; 168];
        day[24 + 3] = 5; // 周二 03 点
        let hours = fold_hourly(&json!({"2023": day.clone(), "2024": day})).unwrap();
        assert_eq!(hours[3], 10.0);
    }

    #[test]
    fn test_fold_hourly_empty() {
        assert!(fold_hourly(&json!([])).is_none());
        assert!(fold_hourly(&json!({})).is_none());
    }

    // 近似估算, 不能当作真实分布来断言, 只验证均分
    #[test]
    fn test_estimate_hourly_is_uniform_approximation() {
        let hours = estimate_hourly(&json!({"2023": 48, "2023-01": 4, "2024": 24})).unwrap();
        assert!(hours.iter().all(|h| (*h - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_estimate_hourly_falls_back_to_monthly_total() {
        let hours = estimate_hourly(&json!({"2023-01": 12, "2023-02": 12})).unwrap();
        assert_eq!(hours[0], 1.0);
        assert!(estimate_hourly(&json!({})).is_none());
    }
}
