use crate::model::{ContributorStats, LocCounts, PunchCardEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::AddAssign;

pub const HOURS_PER_DAY: usize = 24;

/// Shift a UTC hour by `offset` hours, wrapping around midnight.
pub fn shift_hour(hour_utc: u8, offset: i32) -> usize {
    (i32::from(hour_utc) + offset).rem_euclid(HOURS_PER_DAY as i32) as usize
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry<V> {
    pub name: String,
    pub value: V,
}

/// Insertion-ordered accumulation map.
///
/// Values are only ever added to. Sorting is stable, so entries with equal
/// values keep the order in which their keys were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LedgerEntry<V>>", into = "Vec<LedgerEntry<V>>")]
#[serde(bound(
    serialize = "V: Serialize + Clone",
    deserialize = "V: Deserialize<'de> + AddAssign"
))]
pub struct Ledger<V> {
    entries: Vec<LedgerEntry<V>>,
    index: HashMap<String, usize>,
}

impl<V> Default for Ledger<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Ledger<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: V)
    where
        V: AddAssign,
    {
        match self.index.get(name) {
            Some(&i) => self.entries[i].value += value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(LedgerEntry {
                    name: name.to_string(),
                    value,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&i| &self.entries[i].value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|e| keep(&e.name));
        self.reindex();
    }

    /// Sort descending by `key`; ties keep insertion order.
    pub fn sort_desc_by<K: Ord>(&mut self, key: impl Fn(&V) -> K) {
        self.entries.sort_by(|a, b| key(&b.value).cmp(&key(&a.value)));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
    }
}

impl Ledger<u64> {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn max(&self) -> u64 {
        self.entries.iter().map(|e| e.value).max().unwrap_or(0)
    }
}

impl<V: AddAssign> From<Vec<LedgerEntry<V>>> for Ledger<V> {
    fn from(entries: Vec<LedgerEntry<V>>) -> Self {
        let mut ledger = Ledger::new();
        for entry in entries {
            ledger.add(&entry.name, entry.value);
        }
        ledger
    }
}

impl<V> From<Ledger<V>> for Vec<LedgerEntry<V>> {
    fn from(ledger: Ledger<V>) -> Self {
        ledger.entries
    }
}

/// Commit counts by local hour of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlyHistogram([u64; HOURS_PER_DAY]);

impl HourlyHistogram {
    pub fn add(&mut self, hour: usize, commits: u64) {
        self.0[hour % HOURS_PER_DAY] += commits;
    }

    pub fn get(&self, hour: usize) -> u64 {
        self.0.get(hour).copied().unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn sum_range(&self, range: std::ops::Range<usize>) -> u64 {
        range.map(|h| self.get(h)).sum()
    }
}

/// Folds per-repository results into organization-wide maps.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    utc_offset: i32,
    contributors: Ledger<u64>,
    hours: HourlyHistogram,
    languages: Ledger<u64>,
    loc: Ledger<LocCounts>,
}

/// The finished, presentation-ordered maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated {
    pub contributors: Ledger<u64>,
    pub hours: HourlyHistogram,
    pub languages: Ledger<u64>,
    pub loc: Ledger<LocCounts>,
}

impl Aggregator {
    pub fn new(utc_offset: i32) -> Self {
        Self {
            utc_offset,
            ..Default::default()
        }
    }

    /// Returns the number of lines changed this repository contributed.
    pub fn add_contributors(&mut self, stats: &[ContributorStats]) -> u64 {
        let mut repo_total = 0;
        for contributor in stats {
            let Some(author) = &contributor.author else {
                continue;
            };
            let lines = contributor.lines_changed();
            self.contributors.add(&author.login, lines);
            repo_total += lines;
        }
        repo_total
    }

    pub fn add_punch_card(&mut self, card: &[PunchCardEntry]) -> u64 {
        let mut commits_total = 0;
        for &(_day, hour_utc, commits) in card {
            self.hours.add(shift_hour(hour_utc, self.utc_offset), commits);
            commits_total += commits;
        }
        commits_total
    }

    pub fn add_languages<'a>(&mut self, bytes: impl IntoIterator<Item = (&'a str, u64)>) {
        for (language, count) in bytes {
            self.languages.add(language, count);
        }
    }

    pub fn add_loc<'a>(&mut self, counts: impl IntoIterator<Item = (&'a str, LocCounts)>) {
        for (language, count) in counts {
            self.loc.add(language, count);
        }
    }

    /// Drop excluded identities and sort every map for presentation.
    pub fn finish<S: AsRef<str>>(self, exclude_authors: &[S]) -> Aggregated {
        let Aggregator {
            mut contributors,
            hours,
            mut languages,
            mut loc,
            ..
        } = self;

        contributors.retain(|login| !exclude_authors.iter().any(|x| x.as_ref() == login));
        contributors.sort_desc_by(|v| *v);
        languages.sort_desc_by(|v| *v);
        loc.sort_desc_by(|v| v.code);

        Aggregated {
            contributors,
            hours,
            languages,
            loc,
        }
    }
}
