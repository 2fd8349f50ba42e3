use super::{FetchOutcome, Fetcher};
use crate::model::{Member, Repository};
use tracing::{info, warn};

pub const PAGE_SIZE: usize = 100;

/// Which repositories `/orgs/{org}/repos` should list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RepoType {
    #[default]
    All,
    Public,
    Private,
}

impl RepoType {
    pub fn as_str(self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Public => "public",
            RepoType::Private => "private",
        }
    }
}

/// Page through the organization's repositories until a short or missing page.
pub fn list_repositories(fetcher: &Fetcher, org: &str, repo_type: RepoType) -> Vec<Repository> {
    let mut repos = Vec::new();
    for page in 1.. {
        let path = format!(
            "/orgs/{org}/repos?type={}&per_page={PAGE_SIZE}&page={page}",
            repo_type.as_str()
        );
        let batch: Vec<Repository> = match fetcher.fetch(&path) {
            FetchOutcome::Ready(batch) => batch,
            _ => break,
        };
        let last = batch.len() < PAGE_SIZE;
        repos.extend(batch);
        if last {
            break;
        }
    }
    info!(org, count = repos.len(), "listed repositories");
    repos
}

/// Organization member logins.
///
/// Listing every member needs the `admin:org` scope; without it the API
/// returns only public members, so a shorter answer than the known team
/// falls back to the team list.
pub fn fetch_members(fetcher: &Fetcher, org: &str, team: &[String]) -> Vec<String> {
    let path = format!("/orgs/{org}/members?per_page={PAGE_SIZE}");
    match fetcher.fetch::<Vec<Member>>(&path) {
        FetchOutcome::Ready(members) if !members.is_empty() && members.len() >= team.len() => {
            members.into_iter().map(|m| m.login).collect()
        }
        _ => {
            warn!(org, "members API returned partial results, using configured team");
            team.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::retry::tests::{RecordingSleeper, ScriptedApi};
    use crate::github::RetryPolicy;

    fn repos_json(range: std::ops::Range<usize>) -> String {
        let items: Vec<String> = range
            .map(|i| {
                format!(
                    r#"{{"name":"r{i}","private":{},"clone_url":"https://github.com/acme/r{i}.git","stargazers_count":1}}"#,
                    i % 2 == 0
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn pagination_stops_at_short_page() {
        let api = ScriptedApi::new()
            .respond("/orgs/acme/repos?type=all&per_page=100&page=1", 200, &repos_json(0..100))
            .respond("/orgs/acme/repos?type=all&per_page=100&page=2", 200, &repos_json(100..103));
        let sleeper = RecordingSleeper::default();
        let fetcher = Fetcher::new(&api, &sleeper, RetryPolicy::default());

        let repos = list_repositories(&fetcher, "acme", RepoType::All);
        assert_eq!(repos.len(), 103);
        assert_eq!(repos[0].name, "r0");
        assert!(repos[0].private);
        assert_eq!(repos[102].clone_url, "https://github.com/acme/r102.git");
    }

    #[test]
    fn pagination_stops_at_failed_page() {
        let api = ScriptedApi::new()
            .respond("/orgs/acme/repos?type=public&per_page=100&page=1", 200, &repos_json(0..100))
            .respond("/orgs/acme/repos?type=public&per_page=100&page=2", 500, "boom");
        let sleeper = RecordingSleeper::default();
        let fetcher = Fetcher::new(&api, &sleeper, RetryPolicy::default());

        assert_eq!(list_repositories(&fetcher, "acme", RepoType::Public).len(), 100);
    }

    #[test]
    fn members_fall_back_to_team_when_partial() {
        let team = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let api = ScriptedApi::new()
            .respond("/orgs/acme/members?per_page=100", 200, r#"[{"login":"a"}]"#)
            .respond(
                "/orgs/full/members?per_page=100",
                200,
                r#"[{"login":"x"},{"login":"y"},{"login":"z"}]"#,
            );
        let sleeper = RecordingSleeper::default();
        let fetcher = Fetcher::new(&api, &sleeper, RetryPolicy::default());

        assert_eq!(fetch_members(&fetcher, "acme", &team), team);
        assert_eq!(fetch_members(&fetcher, "full", &team), ["x", "y", "z"]);
    }
}
