use super::aggregate::Aggregator;
use crate::github::{FetchOutcome, Fetcher, RetryPolicy};
use crate::model::{ContributorStats, PunchCardEntry, Repository};
use crate::util::progress_bar;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};

/// Per-repository endpoints served by the asynchronous statistics job.
pub const STATS_ENDPOINTS: [&str; 2] = ["stats/contributors", "stats/punch_card"];

pub fn repo_path(org: &str, repo: &Repository, endpoint: &str) -> String {
    format!("/repos/{org}/{}/{endpoint}", repo.name)
}

/// Hit every statistics endpoint once so the server starts computing.
pub fn warm_stats(fetcher: &Fetcher, org: &str, repos: &[Repository], rounds: u32, wait: Duration) {
    for round in 1..=rounds {
        info!(round, rounds, "warming statistics");
        let pb = progress_bar(repos.len() as u64, &format!("Warming stats (round {round})"));
        for repo in repos {
            for endpoint in STATS_ENDPOINTS {
                fetcher.trigger(&repo_path(org, repo, endpoint));
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        fetcher.pause(wait);
    }
}

/// Per-repository results of a statistics endpoint.
///
/// `results[i]` belongs to `repos[i]`; `None` means the data is absent
/// (definitively empty or never ready). `unavailable` lists the repositories
/// that were given up on.
#[derive(Debug)]
pub struct StatsPass<T> {
    pub results: Vec<Option<T>>,
    pub unavailable: Vec<String>,
}

/// Fetch `endpoint` for every repository with backoff, then give every
/// failure a second chance after re-triggering and waiting `cooldown`.
///
/// A payload that fails `usable` counts as not ready.
pub fn fetch_two_pass<T: DeserializeOwned>(
    fetcher: &Fetcher,
    org: &str,
    repos: &[Repository],
    endpoint: &str,
    cooldown: Duration,
    usable: impl Fn(&T) -> bool,
) -> StatsPass<T> {
    let attempt = |repo: &Repository| -> Result<Option<T>, ()> {
        match fetcher.fetch::<T>(&repo_path(org, repo, endpoint)) {
            FetchOutcome::Ready(v) if usable(&v) => Ok(Some(v)),
            FetchOutcome::Empty => Ok(None),
            _ => Err(()),
        }
    };

    let pb = progress_bar(repos.len() as u64, endpoint);
    let mut results = Vec::with_capacity(repos.len());
    let mut failed = Vec::new();
    for (i, repo) in repos.iter().enumerate() {
        match attempt(repo) {
            Ok(v) => results.push(v),
            Err(()) => {
                results.push(None);
                failed.push(i);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failed.is_empty() {
        return StatsPass {
            results,
            unavailable: Vec::new(),
        };
    }

    warn!(
        endpoint,
        count = failed.len(),
        ?cooldown,
        "statistics not ready, retrying after cooldown"
    );
    for &i in &failed {
        fetcher.trigger(&repo_path(org, &repos[i], endpoint));
    }
    fetcher.pause(cooldown);

    let mut unavailable = Vec::new();
    for i in failed {
        match attempt(&repos[i]) {
            Ok(v) => results[i] = v,
            Err(()) => {
                warn!(repo = %repos[i].name, endpoint, "statistics unavailable, skipped");
                unavailable.push(repos[i].name.clone());
            }
        }
    }

    StatsPass {
        results,
        unavailable,
    }
}

/// Lines changed per contributor. Returns the repositories left out.
pub fn fetch_contributors(
    fetcher: &Fetcher,
    org: &str,
    repos: &[Repository],
    cooldown: Duration,
    agg: &mut Aggregator,
) -> Vec<String> {
    // An empty list is what the endpoint serves while the job is still warming up.
    let pass = fetch_two_pass::<Vec<ContributorStats>>(
        fetcher,
        org,
        repos,
        "stats/contributors",
        cooldown,
        |stats| !stats.is_empty(),
    );
    for (repo, stats) in repos.iter().zip(&pass.results) {
        if let Some(stats) = stats {
            let lines = agg.add_contributors(stats);
            info!(repo = %repo.name, lines, "contributor statistics");
        }
    }
    pass.unavailable
}

pub fn fetch_punch_card(
    fetcher: &Fetcher,
    org: &str,
    repos: &[Repository],
    cooldown: Duration,
    agg: &mut Aggregator,
) -> Vec<String> {
    let pass = fetch_two_pass::<Vec<PunchCardEntry>>(
        fetcher,
        org,
        repos,
        "stats/punch_card",
        cooldown,
        |_| true,
    );
    for card in pass.results.iter().flatten() {
        agg.add_punch_card(card);
    }
    pass.unavailable
}

type LanguageBytes = serde_json::Map<String, serde_json::Value>;

/// Bytes per language; the endpoint is not computed asynchronously.
pub fn fetch_languages(fetcher: &Fetcher, org: &str, repos: &[Repository], agg: &mut Aggregator) {
    let policy = RetryPolicy {
        attempts: 1,
        ..fetcher.policy()
    };
    let pb = progress_bar(repos.len() as u64, "languages");
    for repo in repos {
        let path = repo_path(org, repo, "languages");
        let outcome = fetcher.fetch_with::<LanguageBytes>(&path, policy);
        if let FetchOutcome::Ready(map) = outcome {
            agg.add_languages(
                map.iter()
                    .filter_map(|(language, bytes)| bytes.as_u64().map(|b| (language.as_str(), b))),
            );
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
}
