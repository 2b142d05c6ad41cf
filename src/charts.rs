//! Adapters from API mappings to the parallel label/value arrays the SVG
//! renderers draw. Nothing here aggregates; the server already did.

use crate::models::{GenderSplit, GenderTrend, MedalBreakdown, Series};
use serde::Serialize;

pub mod palette {
    pub const GOLD: &str = "#FFD700";
    pub const SILVER: &str = "#C0C0C0";
    pub const BRONZE: &str = "#CD7F32";
    pub const ACCENT1: &str = "#00F5FF";
    pub const ACCENT2: &str = "#FF006E";
    pub const ACCENT3: &str = "#8338EC";
    pub const MUTED: &str = "#6B8CAE";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest value over every dataset, 0 when there are none.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|set| set.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

pub fn series_chart(series: &Series, label: &str, color: &'static str) -> ChartData {
    let (labels, values) = series
        .0
        .iter()
        .map(|(key, value)| (key.clone(), *value))
        .unzip();
    ChartData {
        labels,
        datasets: vec![Dataset {
            label: label.to_string(),
            values,
            color,
        }],
    }
}

pub fn gender_split_chart(split: &GenderSplit) -> ChartData {
    ChartData {
        labels: vec!["Male".to_string(), "Female".to_string()],
        datasets: vec![Dataset {
            label: "Athletes".to_string(),
            values: vec![split.male, split.female],
            color: palette::ACCENT1,
        }],
    }
}

pub fn gender_trend_chart(trend: &GenderTrend) -> ChartData {
    let labels = merged_labels(&[&trend.male, &trend.female]);
    let datasets = vec![
        aligned("Male", &trend.male, &labels, palette::ACCENT1),
        aligned("Female", &trend.female, &labels, palette::ACCENT2),
    ];
    ChartData { labels, datasets }
}

/// Stacked medal counts: one dataset per medal, Gold/Silver/Bronze first.
pub fn medal_type_chart(breakdown: &MedalBreakdown) -> ChartData {
    let all: Vec<&Series> = breakdown.0.iter().map(|(_, series)| series).collect();
    let labels = merged_labels(&all);

    let mut medals: Vec<&(String, Series)> = breakdown.0.iter().collect();
    medals.sort_by_key(|(medal, _)| medal_rank(medal));

    let datasets = medals
        .into_iter()
        .map(|(medal, series)| aligned(medal, series, &labels, medal_color(medal)))
        .collect();
    ChartData { labels, datasets }
}

pub fn feature_importance_chart(importance: &Series) -> ChartData {
    series_chart(importance, "Importance", palette::ACCENT3)
}

fn medal_rank(medal: &str) -> u8 {
    match medal.to_ascii_lowercase().as_str() {
        "gold" => 0,
        "silver" => 1,
        "bronze" => 2,
        _ => 3,
    }
}

fn medal_color(medal: &str) -> &'static str {
    match medal_rank(medal) {
        0 => palette::GOLD,
        1 => palette::SILVER,
        2 => palette::BRONZE,
        _ => palette::MUTED,
    }
}

/// Labels of every series in first-seen order, without duplicates.
fn merged_labels(series: &[&Series]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in series.iter().flat_map(|s| s.labels()) {
        if !labels.iter().any(|seen| seen == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

fn aligned(label: &str, series: &Series, labels: &[String], color: &'static str) -> Dataset {
    Dataset {
        label: label.to_string(),
        values: labels
            .iter()
            .map(|key| series.get(key).unwrap_or(0.0))
            .collect(),
        color,
    }
}
