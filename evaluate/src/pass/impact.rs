use crate::aggregate::GroupMetrics;
use crate::pass::DimensionPass;
use model::Dimension;

pub struct Impact;

impl DimensionPass for Impact {
    fn apply(&self, group: &GroupMetrics) -> f64 {
        0.7 * group.sum("openrank") + 0.3 * group.sum("attention")
    }
    fn dimension(&self) -> Dimension {
        Dimension::Impact
    }
}
