pub mod activity;
pub mod code_quality;
pub mod community;
pub mod efficiency;
pub mod impact;

use crate::aggregate::GroupMetrics;
use model::Dimension;

/// 时长类指标的衰减: 越小贡献越大, 没有数据 (<= 0) 时为 0
pub fn inv(x: f64) -> f64 {
    if x > 0.0 {
        1.0 / (1.0 + x)
    } else {
        0.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        // 积压清理月份里关闭数可能超过新增数, 比率封顶为 1
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// issues_closed / issues_new
pub fn issue_close_rate(group: &GroupMetrics) -> f64 {
    ratio(group.sum("issues_closed"), group.sum("issues_new"))
}

/// change_requests_accepted / change_requests
pub fn cr_accept_rate(group: &GroupMetrics) -> f64 {
    ratio(
        group.sum("change_requests_accepted"),
        group.sum("change_requests"),
    )
}

/// 单个健康度维度在一个 (仓库, 类别) 分组上的取值
pub trait DimensionPass: Send + Sync {
    fn apply(&self, group: &GroupMetrics) -> f64;
    fn dimension(&self) -> Dimension;
}
