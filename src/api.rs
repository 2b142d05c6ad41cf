use crate::config::ApiConfig;
use crate::dashboard::{Filters, PredictorInput, Season};
use crate::errors::ApiError;
use crate::models::{
    CountriesResponse, CountryStats, GenderSplit, GenderTrend, MedalBreakdown, ModelInfo,
    Prediction, Series, SportsResponse, YearsResponse,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

type Params = Vec<(&'static str, String)>;

/// Client for the remote analytics service. Every call is an idempotent GET.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    predict_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            predict_timeout: config.predict_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn predict_medal(&self, input: &PredictorInput) -> Result<Prediction, ApiError> {
        const ENDPOINT: &str = "/predict-medal";
        let params = vec![
            ("age", input.age.to_string()),
            ("sex", input.sex.as_str().to_string()),
            ("height", input.height.to_string()),
            ("weight", input.weight.to_string()),
        ];
        let prediction: Prediction = self
            .get(ENDPOINT, &params, Some(self.predict_timeout))
            .await?;
        if !(0.0..=100.0).contains(&prediction.medal_probability) {
            return Err(ApiError::Schema {
                endpoint: ENDPOINT,
                message: format!(
                    "medal_probability {} is outside 0-100",
                    prediction.medal_probability
                ),
            });
        }
        Ok(prediction)
    }

    pub async fn train_model(&self) -> Result<ModelInfo, ApiError> {
        self.get("/train-model", &[], None).await
    }

    pub async fn countries(&self) -> Result<Vec<String>, ApiError> {
        let body: CountriesResponse = self.get("/filters/countries", &[], None).await?;
        Ok(body.countries)
    }

    pub async fn sports(&self) -> Result<Vec<String>, ApiError> {
        let body: SportsResponse = self.get("/filters/sports", &[], None).await?;
        Ok(body.sports)
    }

    pub async fn years(&self) -> Result<Vec<i32>, ApiError> {
        let body: YearsResponse = self.get("/filters/years", &[], None).await?;
        Ok(body.years)
    }

    pub async fn medals_by_country(&self, filters: &Filters) -> Result<Series, ApiError> {
        let params = filters.params(&[FilterKey::Country, FilterKey::Season]);
        self.get("/medals-by-country", &params, None).await
    }

    pub async fn medals_by_type(&self) -> Result<MedalBreakdown, ApiError> {
        self.get("/medals-by-type", &[], None).await
    }

    pub async fn gender_distribution(&self, filters: &Filters) -> Result<GenderSplit, ApiError> {
        let params = filters.params(&[FilterKey::Country, FilterKey::Season, FilterKey::Sport]);
        self.get("/gender-distribution", &params, None).await
    }

    pub async fn age_distribution(&self, filters: &Filters) -> Result<Series, ApiError> {
        let params = filters.params(&[FilterKey::Country, FilterKey::Sport]);
        self.get("/age-distribution", &params, None).await
    }

    pub async fn medals_over_time(&self, filters: &Filters) -> Result<Series, ApiError> {
        let params = filters.params(&[FilterKey::Country, FilterKey::Season]);
        self.get("/medals-over-time", &params, None).await
    }

    pub async fn top_sports_by_medals(&self, filters: &Filters) -> Result<Series, ApiError> {
        let params = filters.params(&[FilterKey::Country]);
        self.get("/top-sports-by-medals", &params, None).await
    }

    pub async fn avg_age_by_sport(&self, filters: &Filters) -> Result<Series, ApiError> {
        let params = filters.params(&[FilterKey::Country]);
        self.get("/avg-age-by-sport", &params, None).await
    }

    /// `season` is always sent; the backend treats a missing one as Summer.
    pub async fn gender_over_time(&self, season: Option<Season>) -> Result<GenderTrend, ApiError> {
        let params = season_param(season);
        self.get("/gender-over-time", &params, None).await
    }

    pub async fn athlete_count_over_time(
        &self,
        season: Option<Season>,
    ) -> Result<Series, ApiError> {
        let params = season_param(season);
        self.get("/athlete-count-over-time", &params, None).await
    }

    pub async fn country_stats(&self, country: &str) -> Result<CountryStats, ApiError> {
        let params = vec![("country", country.to_string())];
        self.get("/country-stats", &params, None).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&'static str, String)],
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        debug!(endpoint, ?params, "GET");
        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .query(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|err| transport_error(endpoint, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(endpoint, err))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Country,
    Season,
    Sport,
}

impl Filters {
    /// Query pairs for the requested keys, leaving out the unset ones.
    pub fn params(&self, keys: &[FilterKey]) -> Params {
        let mut params = Vec::with_capacity(keys.len());
        for key in keys {
            match key {
                FilterKey::Country if !self.country.is_empty() => {
                    params.push(("country", self.country.clone()));
                }
                FilterKey::Sport if !self.sport.is_empty() => {
                    params.push(("sport", self.sport.clone()));
                }
                FilterKey::Season => {
                    if let Some(season) = self.season {
                        params.push(("season", season.as_str().to_string()));
                    }
                }
                _ => {}
            }
        }
        params
    }
}

fn season_param(season: Option<Season>) -> Params {
    vec![("season", season.unwrap_or(Season::Summer).as_str().to_string())]
}

fn transport_error(endpoint: &'static str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout { endpoint }
    } else {
        ApiError::Transport {
            endpoint,
            source: err,
        }
    }
}

/// Pulls `detail` out of a FastAPI-style error body.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
