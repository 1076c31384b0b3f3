use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 仓库清单 csv 中用到的两列
#[derive(Debug, Clone, Deserialize)]
pub struct RepoTopics {
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicStat {
    /// 首次出现时的原始写法
    pub topic: String,
    pub count: u64,
    pub repos: Vec<String>,
}

/// 统计逗号分隔的 topics, 不区分大小写; 结果按出现次数降序, 次数相同保持首次出现顺序
pub fn count_topics(records: &[RepoTopics]) -> Vec<TopicStat> {
    let mut stats: Vec<TopicStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(topics) = record.topics.as_deref() else {
            continue;
        };
        let repo = record.repo_name.as_deref().unwrap_or("").trim();
        for topic in topics.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let idx = *index.entry(topic.to_lowercase()).or_insert_with(|| {
                stats.push(TopicStat {
                    topic: topic.to_owned(),
                    count: 0,
                    repos: Vec::new(),
                });
                stats.len() - 1
            });
            let stat = &mut stats[idx];
            stat.count += 1;
            if !repo.is_empty() && !stat.repos.iter().any(|r| r == repo) {
                stat.repos.push(repo.to_owned());
            }
        }
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
