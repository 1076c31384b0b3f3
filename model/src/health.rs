use serde::{Deserialize, Serialize};
use std::fmt;

/// 健康度维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Activity,
    Efficiency,
    Impact,
    CodeQuality,
    Community,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Activity,
        Dimension::Efficiency,
        Dimension::Impact,
        Dimension::CodeQuality,
        Dimension::Community,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Activity => "activity",
            Dimension::Efficiency => "efficiency",
            Dimension::Impact => "impact",
            Dimension::CodeQuality => "code_quality",
            Dimension::Community => "community",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 归一化后的类别得分, 取值区间 [6, 10]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHealthScore {
    pub dimension: Dimension,
    pub category: String,
    pub score: f64,
}
