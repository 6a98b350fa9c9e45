use serde::Serialize;

use crate::model::{Population, PrefCode, Prefecture};
use crate::selection::Selection;
use crate::store::SeriesStore;

pub const FIRST_YEAR: i32 = 1960;
pub const YEAR_STEP: i32 = 5;
pub const AXIS_LEN: usize = 13;
pub const YEAR_AXIS: [i32; AXIS_LEN] = year_axis();

pub const X_AXIS_LABEL: &str = "year";
pub const Y_AXIS_LABEL: &str = "population count";

const COLOR_SPACE: f64 = 16_777_215.0;

const fn year_axis() -> [i32; AXIS_LEN] {
    let mut years = [0; AXIS_LEN];
    let mut idx = 0;
    while idx < AXIS_LEN {
        years[idx] = FIRST_YEAR + idx as i32 * YEAR_STEP;
        idx += 1;
    }
    years
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub pref_code: PrefCode,
    pub label: String,
    /// One slot per entry of [`YEAR_AXIS`]; `None` where no value was observed.
    pub values: Vec<Option<f64>>,
    pub color: String,
}

impl ChartDataset {
    pub fn has_values(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    /// The line color as a full `#rrggbb` string.
    pub fn css_color(&self) -> String {
        format!("#{:0>6}", self.color.trim_start_matches('#'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub years: Vec<i32>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.datasets
            .iter()
            .flat_map(|dataset| dataset.values.iter().flatten().copied())
            .fold(None, |acc: Option<f64>, value| {
                Some(acc.map_or(value, |current| current.max(value)))
            })
    }
}

/// Builds one dataset per selected prefecture, in selection order.
pub fn derive_chart(
    catalog: &[Prefecture],
    selection: &Selection,
    store: &SeriesStore,
) -> ChartData {
    let datasets = selection
        .iter()
        .map(|pref_code| ChartDataset {
            pref_code,
            label: prefecture_name(catalog, pref_code)
                .unwrap_or_default()
                .to_string(),
            values: store
                .population(pref_code)
                .map(align_to_axis)
                .unwrap_or_else(|| vec![None; AXIS_LEN]),
            color: border_color(pref_code),
        })
        .collect();

    ChartData {
        years: YEAR_AXIS.to_vec(),
        x_label: X_AXIS_LABEL,
        y_label: Y_AXIS_LABEL,
        datasets,
    }
}

pub fn prefecture_name(catalog: &[Prefecture], pref_code: PrefCode) -> Option<&str> {
    catalog
        .iter()
        .find(|pref| pref.pref_code == pref_code)
        .map(|pref| pref.pref_name.as_str())
}

pub fn align_to_axis(population: &Population) -> Vec<Option<f64>> {
    YEAR_AXIS
        .iter()
        .map(|year| population.value_at(*year))
        .collect()
}

/// Line color for a prefecture: `floor(code * 0.01 * 0xffffff)` in lowercase
/// hex, without zero padding.
pub fn border_color(pref_code: PrefCode) -> String {
    let rgb = (f64::from(pref_code) * 0.01 * COLOR_SPACE).floor() as u64;
    format!("#{rgb:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PopulationPoint;

    fn catalog() -> Vec<Prefecture> {
        serde_json::from_str(
            r#"[
                {"prefCode": 1, "prefName": "Hokkaido"},
                {"prefCode": 13, "prefName": "Tokyo"}
            ]"#,
        )
        .unwrap()
    }

    fn tokyo() -> Population {
        Population {
            label: "Tokyo".to_string(),
            data: (0..18)
                .map(|idx| PopulationPoint {
                    year: FIRST_YEAR + idx * YEAR_STEP,
                    value: 100.0 + idx as f64,
                    rate: None,
                })
                .collect(),
        }
    }

    #[test]
    fn year_axis_spans_1960_to_2020() {
        assert_eq!(YEAR_AXIS.len(), 13);
        assert_eq!(YEAR_AXIS[0], 1960);
        assert_eq!(YEAR_AXIS[12], 2020);
        assert!(YEAR_AXIS.windows(2).all(|pair| pair[1] - pair[0] == 5));
    }

    #[test]
    fn border_color_is_deterministic() {
        assert_eq!(border_color(13), border_color(13));
        assert_eq!(border_color(13), "#2147ad");
        assert_eq!(border_color(47), "#7851eb");
    }

    #[test]
    fn border_color_is_not_padded() {
        assert_eq!(border_color(1), "#28f5c");
        assert_eq!(border_color(0), "#0");
    }

    #[test]
    fn css_color_pads_to_six_digits() {
        let dataset = ChartDataset {
            pref_code: 1,
            label: String::new(),
            values: Vec::new(),
            color: border_color(1),
        };
        assert_eq!(dataset.css_color(), "#028f5c");
    }

    #[test]
    fn datasets_follow_selection_order() {
        let mut selection = Selection::new();
        selection.toggle(13, true);
        selection.toggle(1, true);
        let chart = derive_chart(&catalog(), &selection, &SeriesStore::new());
        let codes: Vec<_> = chart.datasets.iter().map(|d| d.pref_code).collect();
        assert_eq!(codes, vec![13, 1]);
    }

    #[test]
    fn loaded_series_is_aligned_to_year_axis() {
        let mut selection = Selection::new();
        selection.toggle(13, true);
        let mut store = SeriesStore::new();
        store.record(13, tokyo());

        let chart = derive_chart(&catalog(), &selection, &store);
        let dataset = &chart.datasets[0];
        assert_eq!(dataset.label, "Tokyo");
        assert_eq!(dataset.values.len(), AXIS_LEN);
        assert_eq!(dataset.values[0], Some(100.0));
        assert_eq!(dataset.values[12], Some(112.0));
        assert_eq!(chart.max_value(), Some(112.0));
    }

    #[test]
    fn missing_series_gives_empty_values() {
        let mut selection = Selection::new();
        selection.toggle(1, true);
        let chart = derive_chart(&catalog(), &selection, &SeriesStore::new());
        assert!(!chart.datasets[0].has_values());
        assert_eq!(chart.datasets[0].values.len(), AXIS_LEN);
        assert_eq!(chart.max_value(), None);
    }

    #[test]
    fn unknown_code_gets_empty_label() {
        let mut selection = Selection::new();
        selection.toggle(99, true);
        let chart = derive_chart(&catalog(), &selection, &SeriesStore::new());
        assert_eq!(chart.datasets[0].label, "");
    }

    #[test]
    fn sparse_series_leaves_gaps() {
        let population = Population {
            label: String::new(),
            data: vec![PopulationPoint {
                year: 1975,
                value: 7.0,
                rate: Some(1.5),
            }],
        };
        let values = align_to_axis(&population);
        assert_eq!(values[3], Some(7.0));
        assert_eq!(values.iter().flatten().count(), 1);
    }

    #[test]
    fn empty_selection_gives_no_datasets() {
        let chart = derive_chart(&catalog(), &Selection::new(), &SeriesStore::new());
        assert!(chart.is_empty());
        assert_eq!(chart.years.len(), AXIS_LEN);
    }
}
