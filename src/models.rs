use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered `label -> number` mapping as returned by the aggregation endpoints.
///
/// Key order is the order the server wrote them in, which is the order the
/// charts display them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(pub Vec<(String, f64)>);

impl Series {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| *value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl<const N: usize> From<[(&str, f64); N]> for Series {
    fn from(pairs: [(&str, f64); N]) -> Self {
        Series(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Series {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut pairs = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value.as_f64() {
                Some(number) => pairs.push((key, number)),
                None => {
                    return Err(de::Error::custom(format!(
                        "value for `{key}` is not a number: {value}"
                    )));
                }
            }
        }
        Ok(Series(pairs))
    }
}

/// `medal -> (country -> count)` from `/medals-by-type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedalBreakdown(pub Vec<(String, Series)>);

impl Serialize for MedalBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (medal, series) in &self.0 {
            map.serialize_entry(medal, series)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MedalBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut medals = Vec::with_capacity(map.len());
        for (medal, value) in map {
            let series = Series::deserialize(value)
                .map_err(|err| de::Error::custom(format!("medal `{medal}`: {err}")))?;
            medals.push((medal, series));
        }
        Ok(MedalBreakdown(medals))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderSplit {
    #[serde(rename = "M", default)]
    pub male: f64,
    #[serde(rename = "F", default)]
    pub female: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderTrend {
    #[serde(rename = "M", default)]
    pub male: Series,
    #[serde(rename = "F", default)]
    pub female: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub total_athletes: u64,
    #[serde(default)]
    pub total_medals: Option<u64>,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    #[serde(default)]
    pub avg_age: Option<f64>,
    #[serde(default)]
    pub best_sport: Option<String>,
}

/// Body of `/train-model`. Every field is optional; the dashboard hides what
/// is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub feature_importance: Option<Series>,
    #[serde(default)]
    pub features: Option<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub medal_probability: f64,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SportsResponse {
    pub sports: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}
