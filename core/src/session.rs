use tracing::{debug, info, warn};

use crate::chart::{ChartData, derive_chart, prefecture_name};
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{Population, PrefCode, Prefecture};
use crate::selection::Selection;
use crate::store::{SeriesStatus, SeriesStore};

/// A population request the front end has to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub pref_code: PrefCode,
}

impl FetchRequest {
    pub fn url(&self, config: &ApiConfig) -> String {
        config.population_url(self.pref_code)
    }
}

/// Page state shared by the catalog loader, the selection tracker and the
/// series fetcher. Front ends own one session and feed fetch results back
/// into it; the chart is derived from it on demand.
#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: Vec<Prefecture>,
    catalog_loaded: bool,
    selection: Selection,
    series: SeriesStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &[Prefecture] {
        &self.catalog
    }

    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn series(&self) -> &SeriesStore {
        &self.series
    }

    /// Applies the result of the one-time catalog request. On failure the
    /// catalog stays empty. Later calls are ignored.
    pub fn apply_catalog(&mut self, result: Result<Vec<Prefecture>, FetchError>) {
        if self.catalog_loaded {
            debug!("catalog already loaded; ignoring repeated result");
            return;
        }
        self.catalog_loaded = true;
        match result {
            Ok(prefectures) => {
                info!(count = prefectures.len(), "loaded prefecture catalog");
                self.catalog = prefectures;
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                self.catalog.clear();
            }
        }
    }

    /// Applies a checkbox change and returns the request to send, if the code
    /// just became selected and has neither a series nor a request in flight.
    pub fn toggle(&mut self, pref_code: PrefCode, checked: bool) -> Option<FetchRequest> {
        if !self.selection.toggle(pref_code, checked) {
            return None;
        }
        debug!(pref_code, checked, selected = self.selection.len(), "selection changed");
        if !checked || !self.series.begin(pref_code) {
            return None;
        }
        debug!(pref_code, "population request issued");
        Some(FetchRequest { pref_code })
    }

    /// Records the outcome of a population request. Results for codes that
    /// were deselected meanwhile are still kept.
    pub fn apply_series(&mut self, pref_code: PrefCode, result: Result<Population, FetchError>) {
        match result {
            Ok(population) => {
                if !self.series.record(pref_code, population) {
                    debug!(pref_code, "duplicate population response ignored");
                }
            }
            Err(err) => {
                warn!(pref_code, error = %err, "population fetch failed");
                self.series.fail(pref_code, err.failure().clone());
            }
        }
    }

    pub fn status(&self, pref_code: PrefCode) -> SeriesStatus {
        self.series.status(pref_code)
    }

    pub fn is_selected(&self, pref_code: PrefCode) -> bool {
        self.selection.contains(pref_code)
    }

    pub fn prefecture_name(&self, pref_code: PrefCode) -> Option<&str> {
        prefecture_name(&self.catalog, pref_code)
    }

    /// Looks a prefecture up by code or by exact name.
    pub fn find_prefecture(&self, code_or_name: &str) -> Option<&Prefecture> {
        if let Ok(code) = code_or_name.parse::<PrefCode>() {
            return self.catalog.iter().find(|pref| pref.pref_code == code);
        }
        self.catalog
            .iter()
            .find(|pref| pref.pref_name == code_or_name)
    }

    pub fn chart(&self) -> ChartData {
        derive_chart(&self.catalog, &self.selection, &self.series)
    }
}
