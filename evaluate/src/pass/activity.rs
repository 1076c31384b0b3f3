use crate::aggregate::GroupMetrics;
use crate::pass::DimensionPass;
use model::Dimension;

pub struct Activity;

impl DimensionPass for Activity {
    fn apply(&self, group: &GroupMetrics) -> f64 {
        group.sum("activity")
    }
    fn dimension(&self) -> Dimension {
        Dimension::Activity
    }
}
