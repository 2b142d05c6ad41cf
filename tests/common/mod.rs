#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// How long filtered chart requests take to answer. Unfiltered ones answer
/// immediately, so a "select then clear" sequence settles out of order.
pub const FILTERED_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub at: Instant,
}

#[derive(Clone)]
struct Shared {
    log: Arc<Mutex<Vec<Recorded>>>,
    slow: Option<(&'static str, Duration)>,
}

/// In-process stand-in for the analytics API.
pub struct FakeBackend {
    pub base_url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        Self::spawn(None).await
    }

    /// Like `start`, but every request to `path` waits `delay` before answering.
    pub async fn start_with_slow(path: &'static str, delay: Duration) -> Self {
        Self::spawn(Some((path, delay))).await
    }

    async fn spawn(slow: Option<(&'static str, Duration)>) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            log: Arc::clone(&log),
            slow,
        };
        let app = Router::new().fallback(handle).with_state(shared);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            log,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

/// An address nothing listens on.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn handle(
    State(shared): State<Shared>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().to_string();
    shared.log.lock().unwrap().push(Recorded {
        path: path.clone(),
        query: query.clone(),
        at: Instant::now(),
    });

    if let Some((slow_path, delay)) = shared.slow {
        if path == slow_path {
            sleep(delay).await;
        }
    }

    let country = query.get("country").cloned();
    if country.is_some() && path != "/country-stats" {
        sleep(FILTERED_DELAY).await;
    }

    let body = match path.as_str() {
        "/predict-medal" => return predict(&query).await,
        "/train-model" => json!({
            "accuracy": 0.8532,
            "model": "Random Forest",
            "feature_importance": {"Age": 0.31, "Sex": 0.05, "Height": 0.34, "Weight": 0.30}
        }),
        "/filters/countries" => json!({"countries": ["GBR", "Jamaica", "USA"]}),
        "/filters/sports" => json!({"sports": ["Athletics", "Rowing", "Swimming"]}),
        "/filters/years" => json!({"years": [1896, 1900, 2016]}),
        "/medals-by-type" => json!({
            "Bronze": {"USA": 5, "GBR": 2},
            "Gold": {"USA": 10},
            "Silver": {"GBR": 3}
        }),
        "/medals-by-country" => match country {
            Some(country) => {
                let mut filtered = serde_json::Map::new();
                filtered.insert(country, json!(5));
                Value::Object(filtered)
            }
            None => json!({"USA": 120, "GBR": 80}),
        },
        "/gender-distribution" => match country {
            Some(_) => json!({"M": 1, "F": 1}),
            None => json!({"M": 10, "F": 4}),
        },
        "/age-distribution" => {
            if query.get("sport").map(String::as_str) == Some("Broken") {
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
            }
            match country {
                Some(_) => json!({"20-24": 1}),
                None => json!({"20-24": 50, "25-29": 40}),
            }
        }
        "/medals-over-time" => match country {
            Some(_) => json!({"2000": 1}),
            None => json!({"1996": 30, "2000": 40}),
        },
        "/top-sports-by-medals" => match country {
            Some(_) => json!({"Rowing": 1}),
            None => json!({"Swimming": 20, "Athletics": 18}),
        },
        "/avg-age-by-sport" => match country {
            Some(_) => json!({"Rowing": 27.0}),
            None => json!({"Equestrianism": 34.5}),
        },
        "/gender-over-time" => json!({"M": {"1996": 5, "2000": 6}, "F": {"2000": 3}}),
        "/athlete-count-over-time" => json!({"1996": 8, "2000": 9}),
        "/country-stats" => match country {
            Some(_) => json!({
                "total_athletes": 420,
                "total_medals": 67,
                "gold": 17,
                "silver": 30,
                "bronze": 20,
                "avg_age": 24.8,
                "best_sport": "Athletics"
            }),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": "country is required"})),
                )
                    .into_response();
            }
        },
        _ => return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response(),
    };

    Json(body).into_response()
}

/// Echoes the age back as the probability, except for a few ages that
/// trigger failure modes.
async fn predict(query: &HashMap<String, String>) -> Response {
    let age = query.get("age").cloned().unwrap_or_default();
    match age.as_str() {
        "66" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "model offline"})),
        )
            .into_response(),
        "67" => {
            sleep(Duration::from_secs(2)).await;
            Json(json!({"medal_probability": 1.0})).into_response()
        }
        "68" => Json(json!({"model": "Random Forest"})).into_response(),
        "69" => Json(json!({"medal_probability": 180.0})).into_response(),
        other => {
            let probability: f64 = other.parse().unwrap_or(0.0);
            let body = json!({"medal_probability": probability, "model": "Random Forest"});
            Json(body).into_response()
        }
    }
}
