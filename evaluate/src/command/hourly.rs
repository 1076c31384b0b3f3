use crate::command::{generated_at, save_workbook_blocking};
use crate::config::EvaluationContext;
use crate::normalize::round2;
use collector::{collect_hourly, HourlyOutcome, OpenDiggerClient};
use model::{FetchFailure, HourlyProfile, HourlySource, Platform};
use serde::Serialize;
use storage::csv_export::write_csv;
use storage::json_export::write_json;
use storage::{Cell, Table};
use tracing::info;

pub const HOURLY_JSON: &str = "hourly_activity.json";
pub const HOURLY_CSV: &str = "hourly_activity.csv";
pub const HOURLY_XLSX: &str = "hourly_activity.xlsx";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView<'a> {
    platform: Platform,
    org: &'a str,
    repo: &'a str,
    source: HourlySource,
    counts: &'a [f64; 24],
    percentages: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HourlyDocument<'a> {
    generated_at: String,
    profiles: Vec<ProfileView<'a>>,
    overall: Vec<f64>,
    overall_percentages: Vec<f64>,
    errors: &'a [FetchFailure],
}

fn rounded(shares: [f64; 24]) -> Vec<f64> {
    shares.iter().map(|s| round2(*s)).collect()
}

/// 所有仓库按小时累加
fn overall_profile(profiles: &[HourlyProfile]) -> HourlyProfile {
    let mut counts = [0.0; 24];
    for p in profiles {
        for (total, c) in counts.iter_mut().zip(p.counts.iter()) {
            *total += c;
        }
    }
    let all_measured = profiles.iter().all(|p| p.source == HourlySource::Measured);
    HourlyProfile {
        platform: Platform::Github,
        org: String::new(),
        repo: String::from("*"),
        counts,
        source: if all_measured {
            HourlySource::Measured
        } else {
            HourlySource::Estimated
        },
    }
}

fn hourly_table(profiles: &[HourlyProfile]) -> Table {
    let mut table = Table::new(
        "hourly",
        &["platform", "org", "repo", "source", "hour", "count", "percentage"],
    );
    for p in profiles {
        let source = match p.source {
            HourlySource::Measured => "measured",
            HourlySource::Estimated => "estimated",
        };
        for (hour, (count, share)) in p.counts.iter().zip(p.percentages()).enumerate() {
            table.push_row(vec![
                Cell::from(p.platform.as_str()),
                Cell::from(p.org.as_str()),
                Cell::from(p.repo.as_str()),
                Cell::from(source),
                Cell::from(hour as f64),
                Cell::from(*count),
                Cell::from(round2(share)),
            ]);
        }
    }
    table
}

pub async fn run(ctx: &EvaluationContext) -> anyhow::Result<()> {
    let client = OpenDiggerClient::new(&ctx.api.base_url, ctx.api.hourly_timeout())?;
    let outcome = collect_hourly(
        &client,
        &ctx.catalog,
        &ctx.hourly.metric,
        &ctx.hourly.fallback_metric,
    )
    .await;
    info!(
        "hourly activity - profiles= {}, errors= {}",
        outcome.profiles.len(),
        outcome.errors.len()
    );
    let tables = export(ctx, &outcome)?;
    let path = ctx.output.router().path_for(HOURLY_XLSX)?;
    save_workbook_blocking(path, tables, ctx.output.save_policy()).await?;
    Ok(())
}

fn export(ctx: &EvaluationContext, outcome: &HourlyOutcome) -> anyhow::Result<Vec<Table>> {
    let router = ctx.output.router();
    let overall = overall_profile(&outcome.profiles);

    let document = HourlyDocument {
        generated_at: generated_at(),
        profiles: outcome
            .profiles
            .iter()
            .map(|p| ProfileView {
                platform: p.platform,
                org: &p.org,
                repo: &p.repo,
                source: p.source,
                counts: &p.counts,
                percentages: rounded(p.percentages()),
            })
            .collect(),
        overall: overall.counts.to_vec(),
        overall_percentages: rounded(overall.percentages()),
        errors: &outcome.errors,
    };
    write_json(&router.path_for(HOURLY_JSON)?, &document)?;

    let detail = hourly_table(&outcome.profiles);
    write_csv(&router.path_for(HOURLY_CSV)?, &detail)?;

    let mut summary = Table::new("overall", &["hour", "count", "percentage"]);
    for (hour, (count, share)) in overall.counts.iter().zip(overall.percentages()).enumerate() {
        summary.push_row(vec![
            Cell::from(hour as f64),
            Cell::from(*count),
            Cell::from(round2(share)),
        ]);
    }
    Ok(vec![summary, detail])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_context;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_overall_profile_sums_repositories() {
        let mut a = [0.0; 24];
        a[1] = 2.0;
        let mut b = [0.0; 24];
        b[1] = 3.0;
        b[2] = 5.0;
        let profile = |counts, source| HourlyProfile {
            platform: Platform::Github,
            org: "o".into(),
            repo: "r".into(),
            counts,
            source,
        };
        let overall = overall_profile(&[
            profile(a, HourlySource::Measured),
            profile(b, HourlySource::Estimated),
        ]);
        assert_eq!(overall.counts[1], 5.0);
        assert_eq!(overall.total(), 10.0);
        assert_eq!(overall.source, HourlySource::Estimated);
    }

    #[tokio::test]
    async fn test_hourly_exports() {
        let server = MockServer::start().await;
        let mut buckets = vec![0u32; 168];
        buckets[9] = 3;
        buckets[24 * 6 + 9] = 1;
        Mock::given(method("GET"))
            .and(path("/github/apache/doris/active_dates_and_times.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(buckets))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(&server.uri(), tmp.path());
        run(&ctx).await.unwrap();

        let router = ctx.output.router();
        let text = std::fs::read_to_string(router.existing(HOURLY_JSON)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        let profiles = doc["profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["counts"][9], 4.0);
        assert_eq!(profiles[0]["percentages"][9], 100.0);
        assert_eq!(profiles[0]["source"], "measured");
        // pytorch 两个接口都 404
        assert_eq!(doc["errors"].as_array().unwrap().len(), 2);

        let csv = std::fs::read_to_string(router.existing(HOURLY_CSV)).unwrap();
        assert_eq!(csv.lines().count(), 1 + 24);
    }
}
