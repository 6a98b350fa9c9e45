use std::collections::BTreeMap;

use crate::error::FetchFailure;
use crate::model::{Population, PrefCode, SeriesRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStatus {
    NotFetched,
    Loading,
    Loaded,
    Failed,
}

impl SeriesStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesStatus::NotFetched => "未取得",
            SeriesStatus::Loading => "取得中",
            SeriesStatus::Loaded => "取得済み",
            SeriesStatus::Failed => "取得失敗",
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Loading,
    Loaded(Population),
    Failed(FetchFailure),
}

/// Fetched population series keyed by prefecture code.
///
/// A code holds at most one loaded series. Once loaded, later completions for
/// the same code are ignored, so the first successful response is the one
/// the chart shows.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    entries: BTreeMap<PrefCode, Entry>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, pref_code: PrefCode) -> SeriesStatus {
        match self.entries.get(&pref_code) {
            None => SeriesStatus::NotFetched,
            Some(Entry::Loading) => SeriesStatus::Loading,
            Some(Entry::Loaded(_)) => SeriesStatus::Loaded,
            Some(Entry::Failed(_)) => SeriesStatus::Failed,
        }
    }

    /// Marks `pref_code` as in flight if it has no series yet and no request
    /// outstanding. Returns `true` when the caller should issue the request.
    pub fn begin(&mut self, pref_code: PrefCode) -> bool {
        match self.entries.get(&pref_code) {
            None | Some(Entry::Failed(_)) => {
                self.entries.insert(pref_code, Entry::Loading);
                true
            }
            Some(Entry::Loading) | Some(Entry::Loaded(_)) => false,
        }
    }

    /// Stores a fetched series. Returns `false` if one was already loaded.
    pub fn record(&mut self, pref_code: PrefCode, population: Population) -> bool {
        if let Some(Entry::Loaded(_)) = self.entries.get(&pref_code) {
            return false;
        }
        self.entries.insert(pref_code, Entry::Loaded(population));
        true
    }

    /// Stores a fetch failure unless a series is already loaded.
    pub fn fail(&mut self, pref_code: PrefCode, failure: FetchFailure) -> bool {
        if let Some(Entry::Loaded(_)) = self.entries.get(&pref_code) {
            return false;
        }
        self.entries.insert(pref_code, Entry::Failed(failure));
        true
    }

    pub fn population(&self, pref_code: PrefCode) -> Option<&Population> {
        match self.entries.get(&pref_code) {
            Some(Entry::Loaded(population)) => Some(population),
            _ => None,
        }
    }

    pub fn failure(&self, pref_code: PrefCode) -> Option<&FetchFailure> {
        match self.entries.get(&pref_code) {
            Some(Entry::Failed(failure)) => Some(failure),
            _ => None,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = SeriesRecord<'_>> {
        self.entries
            .iter()
            .filter_map(|(code, entry)| match entry {
                Entry::Loaded(population) => Some(SeriesRecord {
                    pref_code: *code,
                    population,
                }),
                _ => None,
            })
    }

    pub fn loading_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, Entry::Loading))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PopulationPoint;

    fn population(label: &str, value: f64) -> Population {
        Population {
            label: label.to_string(),
            data: vec![PopulationPoint {
                year: 1960,
                value,
                rate: None,
            }],
        }
    }

    #[test]
    fn begin_only_once_per_code() {
        let mut store = SeriesStore::new();
        assert!(store.begin(13));
        assert!(!store.begin(13));
        assert_eq!(store.status(13), SeriesStatus::Loading);
        assert_eq!(store.loading_count(), 1);
    }

    #[test]
    fn first_recorded_series_wins() {
        let mut store = SeriesStore::new();
        store.begin(13);
        assert!(store.record(13, population("first", 1.0)));
        assert!(!store.record(13, population("second", 2.0)));
        assert_eq!(store.population(13).map(|p| p.label.as_str()), Some("first"));
        assert!(!store.begin(13));
    }

    #[test]
    fn completions_in_any_order_are_all_kept() {
        let mut store = SeriesStore::new();
        for code in [1, 13, 27] {
            store.begin(code);
        }
        store.record(27, population("c", 3.0));
        store.record(1, population("a", 1.0));
        store.record(13, population("b", 2.0));

        let codes: Vec<_> = store.records().map(|record| record.pref_code).collect();
        assert_eq!(codes, vec![1, 13, 27]);
        assert_eq!(store.loading_count(), 0);
    }

    #[test]
    fn failure_allows_a_new_request() {
        let mut store = SeriesStore::new();
        store.begin(5);
        store.fail(5, FetchFailure::Status(503));
        assert_eq!(store.status(5), SeriesStatus::Failed);
        assert_eq!(store.failure(5), Some(&FetchFailure::Status(503)));
        assert!(store.population(5).is_none());
        assert!(store.begin(5));
    }

    #[test]
    fn failure_does_not_replace_loaded_series() {
        let mut store = SeriesStore::new();
        store.record(5, population("ok", 1.0));
        assert!(!store.fail(5, FetchFailure::EmptyPayload));
        assert_eq!(store.status(5), SeriesStatus::Loaded);
    }
}
