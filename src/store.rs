use crate::api::ApiClient;
use crate::dashboard::{
    Action, ChartUpdate, Dashboard, Effect, Filters, PredictorInput, StaticUpdate,
};
use crate::errors::ApiError;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared dashboard state plus the client its effects talk to.
#[derive(Clone)]
pub struct Store {
    api: ApiClient,
    dashboard: Arc<Mutex<Dashboard>>,
}

impl Store {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            dashboard: Arc::new(Mutex::new(Dashboard::default())),
        }
    }

    pub async fn snapshot(&self) -> Dashboard {
        self.dashboard.lock().await.clone()
    }

    pub async fn bootstrap(&self) {
        self.dispatch(Action::Mount).await;
    }

    /// Applies `action`, then runs whatever fetches it asked for side by side.
    /// Returns once every fetch has settled.
    pub async fn dispatch(&self, action: Action) {
        let effects = self.dashboard.lock().await.apply(action);
        join_all(effects.into_iter().map(|effect| self.run(effect))).await;
    }

    async fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchStatic => self.fetch_static().await,
            Effect::FetchCharts {
                generation,
                filters,
            } => self.fetch_charts(generation, &filters).await,
            Effect::Predict { generation, input } => self.predict(generation, input).await,
        }
    }

    async fn commit(&self, action: Action) {
        let effects = self.dashboard.lock().await.apply(action);
        debug_assert!(effects.is_empty(), "results never schedule more work");
    }

    async fn predict(&self, generation: u64, input: PredictorInput) {
        let outcome = match self.api.predict_medal(&input).await {
            Ok(prediction) => {
                info!(
                    generation,
                    probability = prediction.medal_probability,
                    "prediction received"
                );
                Ok(prediction.medal_probability)
            }
            Err(err) => {
                warn!(generation, error = %err, "prediction failed");
                Err(err.user_message())
            }
        };
        self.commit(Action::PredictionSettled {
            generation,
            outcome,
        })
        .await;
    }

    async fn fetch_static(&self) {
        let api = &self.api;
        tokio::join!(
            async {
                // A failed model fetch only hides the model panels.
                let info = logged(api.train_model().await).ok();
                self.commit(Action::StaticLoaded(StaticUpdate::ModelInfo(info))).await;
            },
            async {
                if let Ok(countries) = logged(api.countries().await) {
                    self.commit(Action::StaticLoaded(StaticUpdate::Countries(countries))).await;
                }
            },
            async {
                if let Ok(sports) = logged(api.sports().await) {
                    self.commit(Action::StaticLoaded(StaticUpdate::Sports(sports))).await;
                }
            },
            async {
                if let Ok(years) = logged(api.years().await) {
                    self.commit(Action::StaticLoaded(StaticUpdate::Years(years))).await;
                }
            },
            async {
                let outcome = describe(api.medals_by_type().await);
                self.commit(Action::StaticLoaded(StaticUpdate::MedalsByType(outcome))).await;
            },
        );
    }

    async fn fetch_charts(&self, generation: u64, filters: &Filters) {
        let api = &self.api;
        let chart =
            move |update: ChartUpdate| self.commit(Action::ChartLoaded { generation, update });

        tokio::join!(
            async {
                let outcome = describe(api.medals_by_country(filters).await);
                chart(ChartUpdate::MedalsByCountry(outcome)).await;
            },
            async {
                let outcome = describe(api.gender_distribution(filters).await);
                chart(ChartUpdate::GenderDistribution(outcome)).await;
            },
            async {
                let outcome = describe(api.age_distribution(filters).await);
                chart(ChartUpdate::AgeDistribution(outcome)).await;
            },
            async {
                let outcome = describe(api.medals_over_time(filters).await);
                chart(ChartUpdate::MedalsOverTime(outcome)).await;
            },
            async {
                let outcome = describe(api.top_sports_by_medals(filters).await);
                chart(ChartUpdate::TopSports(outcome)).await;
            },
            async {
                let outcome = describe(api.avg_age_by_sport(filters).await);
                chart(ChartUpdate::AvgAgeBySport(outcome)).await;
            },
            async {
                let outcome = describe(api.gender_over_time(filters.season).await);
                chart(ChartUpdate::GenderOverTime(outcome)).await;
            },
            async {
                let outcome = describe(api.athlete_count_over_time(filters.season).await);
                chart(ChartUpdate::AthletesOverTime(outcome)).await;
            },
            async {
                if !filters.country.is_empty() {
                    let outcome = describe(api.country_stats(&filters.country).await);
                    chart(ChartUpdate::CountryStats(outcome)).await;
                }
            },
        );
    }
}

fn logged<T>(result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        warn!(endpoint = err.endpoint(), error = %err, "fetch failed");
    }
    result
}

fn describe<T>(result: Result<T, ApiError>) -> Result<T, String> {
    logged(result).map_err(|err| err.to_string())
}
