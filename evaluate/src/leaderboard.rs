use model::LeaderboardEntry;

pub const TOP_N: usize = 10;

/// 按 value -> openrank -> activity 降序 (稳定排序), 取前 n 名并重新编号
pub fn top_n(mut entries: Vec<LeaderboardEntry>, n: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.sort_value().total_cmp(&a.sort_value()));
    entries.truncate(n);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx as u32 + 1;
    }
    entries
}
