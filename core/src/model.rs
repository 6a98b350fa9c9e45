use serde::{Deserialize, Serialize};

pub type PrefCode = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefecture {
    pub pref_code: PrefCode,
    pub pref_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationPoint {
    pub year: i32,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Population {
    pub label: String,
    #[serde(default)]
    pub data: Vec<PopulationPoint>,
}

impl Population {
    /// Value observed for `year`. The first point wins when the payload repeats a year.
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.data
            .iter()
            .find(|point| point.year == year)
            .map(|point| point.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRecord<'a> {
    pub pref_code: PrefCode,
    pub population: &'a Population,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefecture_uses_wire_field_names() {
        let pref: Prefecture =
            serde_json::from_str(r#"{"prefCode": 13, "prefName": "東京都"}"#).unwrap();
        assert_eq!(pref.pref_code, 13);
        assert_eq!(pref.pref_name, "東京都");
    }

    #[test]
    fn rate_is_optional() {
        let population: Population = serde_json::from_str(
            r#"{
                "label": "総人口",
                "data": [
                    {"year": 1960, "value": 9683802},
                    {"year": 1965, "value": 10869244, "rate": 12.2}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(population.data[0].rate, None);
        assert_eq!(population.data[1].rate, Some(12.2));
    }

    #[test]
    fn value_at_prefers_first_point_for_repeated_year() {
        let population = Population {
            label: "総人口".to_string(),
            data: vec![
                PopulationPoint {
                    year: 1960,
                    value: 100.0,
                    rate: None,
                },
                PopulationPoint {
                    year: 1960,
                    value: 200.0,
                    rate: None,
                },
            ],
        };
        assert_eq!(population.value_at(1960), Some(100.0));
        assert_eq!(population.value_at(1965), None);
    }
}
