use crate::client::{FetchError, OpenDiggerClient};
use crate::flatten::{estimate_hourly, flatten_metric, fold_hourly};
use model::opendigger::LeaderboardResponse;
use model::{FetchFailure, FlatRow, HourlyProfile, HourlySource, LeaderboardEntry, RepoConfig};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub rows: Vec<FlatRow>,
    pub errors: Vec<FetchFailure>,
}

/// 按目录顺序逐个抓取 (仓库 x 指标), 一次只发一个请求.
/// 失败只记录, 不重试
pub async fn collect_rows(
    client: &OpenDiggerClient,
    catalog: &[RepoConfig],
    metrics: &[String],
) -> CollectOutcome {
    let mut outcome = CollectOutcome::default();
    let total = catalog.len() * metrics.len();
    let mut done = 0;

    for target in catalog {
        for metric in metrics {
            done += 1;
            match client.fetch_metric(target, metric).await {
                Ok(body) => {
                    let rows = flatten_metric(target, metric, &body);
                    info!(
                        "[{}/{}] {} {}: {} rows",
                        done,
                        total,
                        target.full_name(),
                        metric,
                        rows.len()
                    );
                    outcome.rows.extend(rows);
                }
                Err(failure) => {
                    warn!(
                        "[{}/{}] {} {} failed: {}",
                        done,
                        total,
                        target.full_name(),
                        metric,
                        failure.reason
                    );
                    outcome.errors.push(failure);
                }
            }
        }
    }

    outcome
}

#[derive(Debug, Default)]
pub struct HourlyOutcome {
    pub profiles: Vec<HourlyProfile>,
    pub errors: Vec<FetchFailure>,
}

/// 抓取每个仓库的 7x24 活跃分布; 取不到时退回用 `fallback_metric` 的总量估算
pub async fn collect_hourly(
    client: &OpenDiggerClient,
    catalog: &[RepoConfig],
    hourly_metric: &str,
    fallback_metric: &str,
) -> HourlyOutcome {
    let mut outcome = HourlyOutcome::default();

    for target in catalog {
        let measured = match client.fetch_metric(target, hourly_metric).await {
            Ok(body) => fold_hourly(&body),
            Err(failure) => {
                warn!("{} {} failed: {}", target.full_name(), hourly_metric, failure.reason);
                outcome.errors.push(failure);
                None
            }
        };

        let (counts, source) = match measured {
            Some(counts) => (counts, HourlySource::Measured),
            None => {
                let estimated = match client.fetch_metric(target, fallback_metric).await {
                    Ok(body) => estimate_hourly(&body),
                    Err(failure) => {
                        warn!(
                            "{} {} failed: {}",
                            target.full_name(),
                            fallback_metric,
                            failure.reason
                        );
                        outcome.errors.push(failure);
                        None
                    }
                };
                match estimated {
                    Some(counts) => {
                        warn!(
                            "{} has no hourly data, using uniform estimate from {}",
                            target.full_name(),
                            fallback_metric
                        );
                        (counts, HourlySource::Estimated)
                    }
                    None => continue,
                }
            }
        };

        info!("{}: hourly profile ({:?})", target.full_name(), source);
        outcome.profiles.push(HourlyProfile {
            platform: target.platform,
            org: target.org.clone(),
            repo: target.repo.clone(),
            counts,
            source,
        });
    }

    outcome
}

pub async fn fetch_leaderboard(
    client: &OpenDiggerClient,
    url: &str,
) -> Result<Vec<LeaderboardEntry>, FetchError> {
    let body = client.get_json(url).await?;
    let response: LeaderboardResponse = serde_json::from_value(body)?;
    Ok(response.data.into_iter().map(LeaderboardEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(org: &str, name: &str) -> RepoConfig {
        RepoConfig {
            platform: Platform::Github,
            org: org.into(),
            repo: name.into(),
            country: Some("CN".into()),
            category: Some("ai".into()),
            org_label: None,
        }
    }

    #[tokio::test]
    async fn test_collect_rows_continues_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/github/a/one/openrank.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"2023":1.0,"2024":2.0}"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/github/b/two/openrank.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"2024":3.0}"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpenDiggerClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let catalog = vec![repo("a", "one"), repo("b", "two")];
        let metrics = vec!["openrank".to_string(), "activity".to_string()];
        let outcome = collect_rows(&client, &catalog, &metrics).await;

        assert_eq!(outcome.rows.len(), 3);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors.iter().all(|e| e.metric == "activity"));
        // 目录顺序: 仓库 a 在前
        assert_eq!(outcome.errors[0].repo, "one");
    }

    #[tokio::test]
    async fn test_collect_hourly_measured_and_estimated() {
        let server = MockServer::start().await;
        let mut buckets = vec![0u32; 168];
        buckets[10] = 4;
        buckets[24 + 10] = 6;
        Mock::given(method("GET"))
            .and(path("/github/a/one/active_dates_and_times.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(buckets))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/github/b/two/activity.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"2024":240}"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = OpenDiggerClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let catalog = vec![repo("a", "one"), repo("b", "two"), repo("c", "three")];
        let outcome =
            collect_hourly(&client, &catalog, "active_dates_and_times", "activity").await;

        assert_eq!(outcome.profiles.len(), 2);
        assert_eq!(outcome.profiles[0].source, HourlySource::Measured);
        assert_eq!(outcome.profiles[0].counts[10], 10.0);
        assert_eq!(outcome.profiles[1].source, HourlySource::Estimated);
        assert_eq!(outcome.profiles[1].counts[0], 10.0);
        // two: 小时接口失败; three: 两个接口都失败
        assert_eq!(outcome.errors.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_leaderboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/leaderboards/openrank.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"item":{"name":"x/y"},"rank":1,"value":9.5}]}"#,
            ))
            .mount(&server)
            .await;

        let client = OpenDiggerClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let url = format!("{}/leaderboards/openrank.json", server.uri());
        let entries = fetch_leaderboard(&client, &url).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "x/y");
        assert_eq!(entries[0].value, Some(9.5));
    }
}
