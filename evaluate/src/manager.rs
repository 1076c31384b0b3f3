use crate::aggregate::group_by_repo_category;
use crate::normalize::{category_display_name, min_max_scale};
use crate::pass::activity::Activity;
use crate::pass::code_quality::CodeQuality;
use crate::pass::community::Community;
use crate::pass::efficiency::Efficiency;
use crate::pass::impact::Impact;
use crate::pass::DimensionPass;
use model::{CategoryHealthScore, Dimension, FlatRow};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 单个 (仓库, 类别) 分组在各维度上的原始值
#[derive(Debug, Clone, PartialEq)]
pub struct GroupScore {
    pub repo: String,
    pub category: String,
    pub values: BTreeMap<Dimension, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub country: String,
    pub groups: Vec<GroupScore>,
    /// 维度 -> 类别标签 -> 归一化前的类别均值
    pub category_values: BTreeMap<Dimension, BTreeMap<String, f64>>,
    pub scores: Vec<CategoryHealthScore>,
}

pub struct EvaluationManager {
    passes: Vec<Arc<dyn DimensionPass>>,
}

impl Default for EvaluationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    // 五个健康度维度
    pub fn add_default_passes(&mut self) {
        self.add_pass(Arc::new(Activity));
        self.add_pass(Arc::new(Efficiency));
        self.add_pass(Arc::new(Impact));
        self.add_pass(Arc::new(CodeQuality));
        self.add_pass(Arc::new(Community));
    }

    pub fn add_pass(&mut self, pass: Arc<dyn DimensionPass>) {
        self.passes.push(pass);
    }

    pub fn run(&self, rows: &[FlatRow], country: &str) -> HealthReport {
        let groups = group_by_repo_category(rows, country);
        info!("{} repo-category groups for country {}", groups.len(), country);

        let mut collected: BTreeMap<Dimension, BTreeMap<String, Vec<f64>>> = BTreeMap::new();
        let mut group_scores = Vec::with_capacity(groups.len());
        for (key, metrics) in &groups {
            let mut values = BTreeMap::new();
            for pass in &self.passes {
                let value = pass.apply(metrics);
                values.insert(pass.dimension(), value);
                collected
                    .entry(pass.dimension())
                    .or_default()
                    .entry(key.category.clone())
                    .or_default()
                    .push(value);
            }
            debug!("{} [{}] - {:?}", key.repo, key.category, values);
            group_scores.push(GroupScore {
                repo: key.repo.clone(),
                category: key.category.clone(),
                values,
            });
        }

        // 类别取值 = 该类别下各分组的算术平均
        let category_values: BTreeMap<Dimension, BTreeMap<String, f64>> = collected
            .into_iter()
            .map(|(dimension, by_category)| {
                let means = by_category
                    .into_iter()
                    .map(|(category, vals)| {
                        let mean = vals.iter().sum::<f64>() / vals.len() as f64;
                        (category, mean)
                    })
                    .collect();
                (dimension, means)
            })
            .collect();

        let mut scores = Vec::new();
        for (dimension, values) in &category_values {
            for (category, score) in min_max_scale(values) {
                scores.push(CategoryHealthScore {
                    dimension: *dimension,
                    category: category_display_name(&category),
                    score,
                });
            }
        }

        info!(
            "Health overview completed - {} categories, {} scores",
            category_values.values().next().map_or(0, BTreeMap::len),
            scores.len()
        );

        HealthReport {
            country: country.to_owned(),
            groups: group_scores,
            category_values,
            scores,
        }
    }
}
