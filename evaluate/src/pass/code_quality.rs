use crate::aggregate::GroupMetrics;
use crate::pass::{inv, issue_close_rate, DimensionPass};
use model::Dimension;

pub struct CodeQuality;

impl DimensionPass for CodeQuality {
    fn apply(&self, group: &GroupMetrics) -> f64 {
        0.4 * issue_close_rate(group)
            + 0.3 * inv(group.avg("issue_resolution_duration"))
            + 0.3 * inv(group.avg("issue_age"))
    }
    fn dimension(&self) -> Dimension {
        Dimension::CodeQuality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_rate_contribution() {
        let mut group = GroupMetrics::default();
        group.fold("issues_new", 10.0);
        group.fold("issues_closed", 5.0);
        assert!((CodeQuality.apply(&group) - 0.2).abs() < 1e-12);
    }
}
