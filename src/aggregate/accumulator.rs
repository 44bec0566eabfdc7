use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::SortKey;
use crate::types::Entry;

/// Running totals shared by every accumulator kind
pub trait Tally {
    fn key(&self) -> &str;
    fn points(&self) -> u64;
    fn percentage(&self) -> f64;
    fn set_percentage(&mut self, percentage: f64);
}

/// Points collected for one composer or publisher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonAccumulator {
    pub name: String,
    /// Organization of the most recent entry for this name
    pub org: String,
    /// Identifier of the most recent entry for this name
    pub identifier: String,
    pub points: u64,
    pub percentage: f64,
}

impl PersonAccumulator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            org: String::new(),
            identifier: String::new(),
            points: 0,
            percentage: 0.0,
        }
    }

    /// Add the entry's share; org and identifier are last-write-wins
    pub fn record(&mut self, entry: &Entry) {
        self.points += u64::from(entry.share);
        self.org.clone_from(&entry.org);
        self.identifier.clone_from(&entry.identifier);
    }
}

impl Tally for PersonAccumulator {
    fn key(&self) -> &str {
        &self.name
    }

    fn points(&self) -> u64 {
        self.points
    }

    fn percentage(&self) -> f64 {
        self.percentage
    }

    fn set_percentage(&mut self, percentage: f64) {
        self.percentage = percentage;
    }
}

/// Points collected for one rights organization across all its members
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgAccumulator {
    pub org: String,
    pub points: u64,
    pub percentage: f64,
}

impl OrgAccumulator {
    pub fn new(org: &str) -> Self {
        Self {
            org: org.to_string(),
            points: 0,
            percentage: 0.0,
        }
    }

    pub fn record(&mut self, entry: &Entry) {
        self.points += u64::from(entry.share);
    }
}

impl Tally for OrgAccumulator {
    fn key(&self) -> &str {
        &self.org
    }

    fn points(&self) -> u64 {
        self.points
    }

    fn percentage(&self) -> f64 {
        self.percentage
    }

    fn set_percentage(&mut self, percentage: f64) {
        self.percentage = percentage;
    }
}

/// Share of `total_points` held by `points`, in percent; 0 when nothing is available
pub fn percentage_of(points: u64, total_points: u64) -> f64 {
    if total_points == 0 {
        return 0.0;
    }
    points as f64 / total_points as f64 * 100.0
}

/// Accumulators keyed by name, iterated in first-seen order
#[derive(Debug, Clone)]
pub struct AccumulatorSet<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for AccumulatorSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Tally> AccumulatorSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for `key`, created with `make` on first sight
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.items.push(make());
                let idx = self.items.len() - 1;
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &mut self.items[idx]
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn total_points(&self) -> u64 {
        self.items.iter().map(T::points).sum()
    }

    /// Fill in every percentage against `total_points`
    pub fn normalize(&mut self, total_points: u64) {
        for item in &mut self.items {
            let pct = percentage_of(item.points(), total_points);
            item.set_percentage(pct);
        }
    }

    /// Descending by `key`; equal values keep first-seen order
    pub fn sorted_by(&self, key: SortKey) -> Vec<&T> {
        let mut view: Vec<&T> = self.items.iter().collect();
        match key {
            SortKey::Points => view.sort_by(|a, b| b.points().cmp(&a.points())),
            SortKey::Percentage => view.sort_by(|a, b| b.percentage().total_cmp(&a.percentage())),
        }
        view
    }

    /// Keys whose points exceed `limit`
    pub fn over_limit(&self, limit: u64) -> impl Iterator<Item = &T> {
        self.items.iter().filter(move |item| item.points() > limit)
    }
}

impl<T: Serialize> Serialize for AccumulatorSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, org: &str, share: u32, identifier: &str) -> Entry {
        Entry {
            name: name.to_string(),
            org: org.to_string(),
            share,
            identifier: identifier.to_string(),
        }
    }

    fn record(set: &mut AccumulatorSet<PersonAccumulator>, e: Entry) {
        set.get_or_insert_with(&e.name, || PersonAccumulator::new(&e.name))
            .record(&e);
    }

    #[test]
    fn test_last_entry_overwrites_org_and_identifier() {
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Alice", "ASCAP", 50, ""));
        record(&mut set, entry("Alice", "PRS", 25, "999"));

        assert_eq!(set.len(), 1);
        let alice = set.get("Alice").unwrap();
        assert_eq!(alice.points, 75);
        assert_eq!(alice.org, "PRS");
        assert_eq!(alice.identifier, "999");
    }

    #[test]
    fn test_iteration_is_first_seen_order() {
        let mut set = AccumulatorSet::new();
        for name in ["Carol", "Alice", "Bob", "Alice"] {
            record(&mut set, entry(name, "X", 10, ""));
        }
        let names: Vec<&str> = set.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
        assert_eq!(set.total_points(), 40);
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Carol", "X", 30, ""));
        record(&mut set, entry("Alice", "X", 50, ""));
        record(&mut set, entry("Bob", "X", 30, ""));
        record(&mut set, entry("Dan", "X", 50, ""));
        set.normalize(200);

        for key in [SortKey::Points, SortKey::Percentage] {
            let names: Vec<&str> = set.sorted_by(key).into_iter().map(|a| a.name.as_str()).collect();
            assert_eq!(names, vec!["Alice", "Dan", "Carol", "Bob"]);
        }
    }

    #[test]
    fn test_normalize_against_total() {
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Alice", "X", 150, ""));
        set.normalize(300);
        assert!((set.get("Alice").unwrap().percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_gives_zero_percentage() {
        assert_eq!(percentage_of(40, 0), 0.0);
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Alice", "X", 40, ""));
        set.normalize(0);
        assert_eq!(set.get("Alice").unwrap().percentage, 0.0);
    }

    #[test]
    fn test_org_accumulator_sums_members() {
        let mut orgs: AccumulatorSet<OrgAccumulator> = AccumulatorSet::new();
        for e in [entry("A", "ASCAP", 30, ""), entry("B", "ASCAP", 20, "")] {
            orgs.get_or_insert_with(&e.org, || OrgAccumulator::new(&e.org))
                .record(&e);
        }
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs.get("ASCAP").unwrap().points, 50);
        assert_eq!(orgs.get("ASCAP").unwrap().key(), "ASCAP");
    }

    #[test]
    fn test_over_limit() {
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Alice", "X", 120, ""));
        record(&mut set, entry("Bob", "X", 100, ""));
        let over: Vec<&str> = set.over_limit(100).map(|a| a.name.as_str()).collect();
        assert_eq!(over, vec!["Alice"]);
    }

    #[test]
    fn test_serializes_as_ordered_list() {
        let mut set = AccumulatorSet::new();
        record(&mut set, entry("Bob", "BMI", 40, "222"));
        record(&mut set, entry("Alice", "ASCAP", 60, "111"));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["name"], "Bob");
        assert_eq!(json[1]["name"], "Alice");
        assert_eq!(json[1]["identifier"], "111");
    }
}
