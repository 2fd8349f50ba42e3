use crate::stats::aggregate::{HourlyHistogram, Ledger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

pub const SCHEMA_VERSION: u32 = 2;

/// A repository as listed by `/orgs/{org}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub private: bool,
    pub clone_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeklyChange {
    #[serde(default)]
    pub a: u64,
    #[serde(default)]
    pub d: u64,
}

/// One entry of `stats/contributors`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorStats {
    pub author: Option<Author>,
    #[serde(default)]
    pub weeks: Vec<WeeklyChange>,
}

impl ContributorStats {
    pub fn lines_changed(&self) -> u64 {
        self.weeks.iter().map(|w| w.a + w.d).sum()
    }
}

/// `[day_of_week, hour_utc, commits]` as returned by `stats/punch_card`.
pub type PunchCardEntry = (u8, u8, u64);

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub login: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocCounts {
    pub files: u64,
    pub code: u64,
    pub comments: u64,
    pub blanks: u64,
}

impl AddAssign for LocCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.code += rhs.code;
        self.comments += rhs.comments;
        self.blanks += rhs.blanks;
    }
}

/// Aggregated organization statistics, as stored by `snapshot` and consumed by `render`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub org: String,
    pub total_repos: usize,
    pub public_repos: usize,
    /// Repositories whose statistics never became available.
    #[serde(default)]
    pub unavailable: Vec<String>,
    pub contributors: Ledger<u64>,
    /// Hours added to UTC when `hours` was bucketed.
    pub utc_offset: i32,
    pub hours: HourlyHistogram,
    pub languages: Ledger<u64>,
    pub loc: Ledger<LocCounts>,
    pub members: Vec<String>,
}

impl ProfileData {
    pub fn private_repos(&self) -> usize {
        self.total_repos.saturating_sub(self.public_repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributor_lines_sum_additions_and_deletions() {
        let stats: ContributorStats = serde_json::from_str(
            r#"{"author":{"login":"octo"},"total":3,"weeks":[{"w":1,"a":10,"d":2,"c":1},{"w":2,"a":5,"c":2}]}"#,
        )
        .unwrap();
        assert_eq!(stats.lines_changed(), 17);
        assert_eq!(stats.author.unwrap().login, "octo");
    }

    #[test]
    fn punch_card_triples_decode() {
        let card: Vec<PunchCardEntry> = serde_json::from_str("[[0,23,4],[6,20,1]]").unwrap();
        assert_eq!(card, vec![(0, 23, 4), (6, 20, 1)]);
    }
}
