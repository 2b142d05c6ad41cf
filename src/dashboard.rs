//! View state of the dashboard and the actions that change it.
//!
//! `Dashboard::apply` is the only way state changes. It never performs I/O;
//! it hands back the [`Effect`]s the caller must run, and the results of those
//! effects come back in as further actions tagged with the generation they
//! were issued under.

use crate::models::{CountryStats, GenderSplit, GenderTrend, MedalBreakdown, ModelInfo, Series};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Trends,
    Athletes,
    Country,
    Predict,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Trends,
        Tab::Athletes,
        Tab::Country,
        Tab::Predict,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Trends => "trends",
            Tab::Athletes => "athletes",
            Tab::Country => "country",
            Tab::Predict => "predict",
        }
    }

    /// Whether the filter bar applies to this tab's cards.
    pub fn uses_filters(self) -> bool {
        !matches!(self, Tab::Predict)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == value)
            .ok_or_else(|| format!("unknown tab '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    M,
    F,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::M => "Male",
            Sex::F => "Female",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            _ => Err("sex must be 'M' or 'F'".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Summer, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }

    /// Empty input means "all seasons".
    pub fn parse_optional(value: &str) -> Result<Option<Season>, String> {
        match value.trim() {
            "" => Ok(None),
            "Summer" => Ok(Some(Season::Summer)),
            "Winter" => Ok(Some(Season::Winter)),
            other => Err(format!("unknown season '{other}'")),
        }
    }
}

pub const AGE_RANGE: RangeInclusive<u32> = 14..=70;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 140..=220;
pub const WEIGHT_RANGE: RangeInclusive<u32> = 40..=150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorInput {
    pub age: u32,
    pub sex: Sex,
    pub height: u32,
    pub weight: u32,
}

impl Default for PredictorInput {
    fn default() -> Self {
        Self {
            age: 25,
            sex: Sex::M,
            height: 175,
            weight: 70,
        }
    }
}

impl PredictorInput {
    /// Builds an input with every slider value held to its range.
    pub fn clamped(age: u32, sex: Sex, height: u32, weight: u32) -> Self {
        Self {
            age: clamp(age, &AGE_RANGE),
            sex,
            height: clamp(height, &HEIGHT_RANGE),
            weight: clamp(weight, &WEIGHT_RANGE),
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionView {
    pub input: PredictorInput,
    pub result: Option<f64>,
    pub error: Option<String>,
    pub loading: bool,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub country: String,
    pub season: Option<Season>,
    pub sport: String,
}

impl Filters {
    pub fn is_unfiltered(&self) -> bool {
        self.country.is_empty() && self.season.is_none() && self.sport.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub sports: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum Slot<T> {
    Empty,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<T> Slot<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Slot::Loaded(value) => Some(value),
            _ => None,
        }
    }

    fn settle(&mut self, outcome: Result<T, String>) {
        *self = match outcome {
            Ok(value) => Slot::Loaded(value),
            Err(message) => Slot::Failed(message),
        };
    }
}

/// Data behind the filter-dependent charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Charts {
    pub medals_by_country: Slot<Series>,
    pub gender_distribution: Slot<GenderSplit>,
    pub age_distribution: Slot<Series>,
    pub medals_over_time: Slot<Series>,
    pub top_sports: Slot<Series>,
    pub avg_age_by_sport: Slot<Series>,
    pub gender_over_time: Slot<GenderTrend>,
    pub athletes_over_time: Slot<Series>,
    pub country_stats: Slot<CountryStats>,
}

#[derive(Debug, Clone)]
pub enum ChartUpdate {
    MedalsByCountry(Result<Series, String>),
    GenderDistribution(Result<GenderSplit, String>),
    AgeDistribution(Result<Series, String>),
    MedalsOverTime(Result<Series, String>),
    TopSports(Result<Series, String>),
    AvgAgeBySport(Result<Series, String>),
    GenderOverTime(Result<GenderTrend, String>),
    AthletesOverTime(Result<Series, String>),
    CountryStats(Result<CountryStats, String>),
}

impl ChartUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            ChartUpdate::MedalsByCountry(_) => "medals-by-country",
            ChartUpdate::GenderDistribution(_) => "gender-distribution",
            ChartUpdate::AgeDistribution(_) => "age-distribution",
            ChartUpdate::MedalsOverTime(_) => "medals-over-time",
            ChartUpdate::TopSports(_) => "top-sports-by-medals",
            ChartUpdate::AvgAgeBySport(_) => "avg-age-by-sport",
            ChartUpdate::GenderOverTime(_) => "gender-over-time",
            ChartUpdate::AthletesOverTime(_) => "athlete-count-over-time",
            ChartUpdate::CountryStats(_) => "country-stats",
        }
    }
}

/// Results of the fetches that do not depend on filters.
#[derive(Debug, Clone)]
pub enum StaticUpdate {
    ModelInfo(Option<ModelInfo>),
    Countries(Vec<String>),
    Sports(Vec<String>),
    Years(Vec<i32>),
    MedalsByType(Result<MedalBreakdown, String>),
}

#[derive(Debug, Clone)]
pub enum Action {
    Mount,
    SelectTab(Tab),
    SubmitPrediction(PredictorInput),
    PredictionSettled {
        generation: u64,
        outcome: Result<f64, String>,
    },
    SetFilters(Filters),
    ResetFilters,
    ChartLoaded {
        generation: u64,
        update: ChartUpdate,
    },
    StaticLoaded(StaticUpdate),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchStatic,
    FetchCharts { generation: u64, filters: Filters },
    Predict { generation: u64, input: PredictorInput },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub tab: Tab,
    pub prediction: PredictionView,
    pub model_info: Option<ModelInfo>,
    pub options: FilterOptions,
    pub filters: Filters,
    pub generation: u64,
    pub charts: Charts,
    pub medals_by_type: Slot<MedalBreakdown>,
    pub synced_at: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => vec![Effect::FetchStatic, self.fetch_charts(self.filters.clone())],
            Action::SelectTab(tab) => {
                self.tab = tab;
                Vec::new()
            }
            Action::SubmitPrediction(input) => {
                let view = &mut self.prediction;
                view.input = input;
                view.generation += 1;
                view.loading = true;
                view.error = None;
                vec![Effect::Predict {
                    generation: view.generation,
                    input,
                }]
            }
            Action::PredictionSettled {
                generation,
                outcome,
            } => {
                let view = &mut self.prediction;
                if generation != view.generation {
                    debug!(generation, current = view.generation, "discarding stale prediction");
                    return Vec::new();
                }
                view.loading = false;
                match outcome {
                    Ok(probability) => {
                        view.result = Some(probability);
                        view.error = None;
                    }
                    Err(message) => {
                        view.result = None;
                        view.error = Some(message);
                    }
                }
                Vec::new()
            }
            Action::SetFilters(filters) => vec![self.fetch_charts(filters)],
            Action::ResetFilters => vec![self.fetch_charts(Filters::default())],
            Action::ChartLoaded { generation, update } => {
                if generation != self.generation {
                    debug!(
                        chart = update.name(),
                        generation,
                        current = self.generation,
                        "discarding stale chart response"
                    );
                    return Vec::new();
                }
                self.apply_chart(update);
                self.synced_at = Some(Local::now());
                Vec::new()
            }
            Action::StaticLoaded(update) => {
                match update {
                    StaticUpdate::ModelInfo(info) => self.model_info = info,
                    StaticUpdate::Countries(countries) => self.options.countries = countries,
                    StaticUpdate::Sports(sports) => self.options.sports = sports,
                    StaticUpdate::Years(years) => self.options.years = years,
                    StaticUpdate::MedalsByType(outcome) => self.medals_by_type.settle(outcome),
                }
                Vec::new()
            }
        }
    }

    fn fetch_charts(&mut self, filters: Filters) -> Effect {
        self.generation += 1;
        // Country stats only ever describe the selected country.
        if filters.country.is_empty() || filters.country != self.filters.country {
            self.charts.country_stats = Slot::Empty;
        }
        self.filters = filters;
        Effect::FetchCharts {
            generation: self.generation,
            filters: self.filters.clone(),
        }
    }

    fn apply_chart(&mut self, update: ChartUpdate) {
        let charts = &mut self.charts;
        match update {
            ChartUpdate::MedalsByCountry(outcome) => charts.medals_by_country.settle(outcome),
            ChartUpdate::GenderDistribution(outcome) => charts.gender_distribution.settle(outcome),
            ChartUpdate::AgeDistribution(outcome) => charts.age_distribution.settle(outcome),
            ChartUpdate::MedalsOverTime(outcome) => charts.medals_over_time.settle(outcome),
            ChartUpdate::TopSports(outcome) => charts.top_sports.settle(outcome),
            ChartUpdate::AvgAgeBySport(outcome) => charts.avg_age_by_sport.settle(outcome),
            ChartUpdate::GenderOverTime(outcome) => charts.gender_over_time.settle(outcome),
            ChartUpdate::AthletesOverTime(outcome) => charts.athletes_over_time.settle(outcome),
            ChartUpdate::CountryStats(outcome) => charts.country_stats.settle(outcome),
        }
    }
}
