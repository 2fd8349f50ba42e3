use crate::config::ProfileConfig;
use crate::error::Result;
use crate::github::repos::RepoType;
use crate::github::{fetch_members, list_repositories, Api, Fetcher, RetryPolicy, Sleeper};
use crate::model::{ProfileData, SCHEMA_VERSION};
use crate::stats::{self, Aggregator, LocCounter};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub org: String,
    pub token: Option<String>,
    pub repo_type: RepoType,
    pub retry: RetryPolicy,
    pub cooldown: Duration,
    pub warmup_rounds: u32,
    pub warmup_wait: Duration,
    pub utc_offset: i32,
    pub skip_loc: bool,
}

impl PipelineOptions {
    pub fn new(org: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            token: None,
            repo_type: RepoType::All,
            retry: RetryPolicy::default(),
            cooldown: Duration::from_secs(15),
            warmup_rounds: 2,
            warmup_wait: Duration::from_secs(15),
            utc_offset: 9,
            skip_loc: false,
        }
    }
}

/// List, warm, fetch and aggregate. Per-repository failures are logged and
/// leave that repository out of the affected maps.
pub fn collect(
    api: &dyn Api,
    sleeper: &dyn Sleeper,
    options: &PipelineOptions,
    config: &ProfileConfig,
) -> Result<ProfileData> {
    let org = options.org.as_str();
    let fetcher = Fetcher::new(api, sleeper, options.retry);

    let repos = list_repositories(&fetcher, org, options.repo_type);
    let public_repos = repos.iter().filter(|r| !r.private).count();
    info!(
        total = repos.len(),
        public = public_repos,
        private = repos.len() - public_repos,
        "repositories"
    );

    stats::warm_stats(&fetcher, org, &repos, options.warmup_rounds, options.warmup_wait);

    let mut agg = Aggregator::new(options.utc_offset);
    let mut unavailable =
        stats::fetch_contributors(&fetcher, org, &repos, options.cooldown, &mut agg);
    for name in stats::fetch_punch_card(&fetcher, org, &repos, options.cooldown, &mut agg) {
        if !unavailable.contains(&name) {
            unavailable.push(name);
        }
    }
    stats::fetch_languages(&fetcher, org, &repos, &mut agg);
    let members = fetch_members(&fetcher, org, &config.team);

    if options.skip_loc {
        info!("lines of code skipped");
    } else if let Err(e) = LocCounter::new(options.token.clone()).count_all(&repos, &mut agg) {
        warn!(error = %e, "lines of code unavailable");
    }

    let aggregated = agg.finish(config.exclude_authors.as_slice());
    info!(
        contributors = aggregated.contributors.len(),
        languages = aggregated.languages.len(),
        unavailable = unavailable.len(),
        "aggregated"
    );

    Ok(ProfileData {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        org: org.to_string(),
        total_repos: repos.len(),
        public_repos,
        unavailable,
        contributors: aggregated.contributors,
        utc_offset: options.utc_offset,
        hours: aggregated.hours,
        languages: aggregated.languages,
        loc: aggregated.loc,
        members,
    })
}
