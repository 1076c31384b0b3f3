use crate::aggregate::GroupMetrics;
use crate::pass::{inv, DimensionPass};
use model::Dimension;

pub struct Community;

impl DimensionPass for Community {
    fn apply(&self, group: &GroupMetrics) -> f64 {
        0.3 * group.avg("contributors")
            + 0.25 * group.avg("new_contributors")
            + 0.2 * group.avg("bus_factor")
            + 0.25 * inv(group.avg("inactive_contributors"))
    }
    fn dimension(&self) -> Dimension {
        Dimension::Community
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_community_uses_averages() {
        let mut group = GroupMetrics::default();
        group.fold("contributors", 10.0);
        group.fold("contributors", 20.0);
        group.fold("new_contributors", 4.0);
        group.fold("bus_factor", 5.0);
        group.fold("inactive_contributors", 1.0);
        let expected = 0.3 * 15.0 + 0.25 * 4.0 + 0.2 * 5.0 + 0.25 * 0.5;
        assert!((Community.apply(&group) - expected).abs() < 1e-12);
    }
}
