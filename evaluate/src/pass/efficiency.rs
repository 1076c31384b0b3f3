use crate::aggregate::GroupMetrics;
use crate::pass::{cr_accept_rate, inv, issue_close_rate, DimensionPass};
use model::Dimension;

const ISSUE_CLOSE_WEIGHT: f64 = 0.35;
const CR_ACCEPT_WEIGHT: f64 = 0.25;
const ISSUE_RESOLUTION_WEIGHT: f64 = 0.2;
const CR_DURATION_WEIGHT: f64 = 0.2;

pub struct Efficiency;

impl Efficiency {
    // 均值为 0 时改用 response_time. 注意 0 既可能是"没有数据"也可能是真实的 0 时长,
    // 两者在这里不做区分
    fn change_request_duration(group: &GroupMetrics) -> f64 {
        let duration = group.avg("change_requests_duration");
        if duration != 0.0 {
            duration
        } else {
            group.avg("change_requests_response_time")
        }
    }
}

impl DimensionPass for Efficiency {
    fn apply(&self, group: &GroupMetrics) -> f64 {
        ISSUE_CLOSE_WEIGHT * issue_close_rate(group)
            + CR_ACCEPT_WEIGHT * cr_accept_rate(group)
            + ISSUE_RESOLUTION_WEIGHT * inv(group.avg("issue_resolution_duration"))
            + CR_DURATION_WEIGHT * inv(Self::change_request_duration(group))
    }
    fn dimension(&self) -> Dimension {
        Dimension::Efficiency
    }
}
