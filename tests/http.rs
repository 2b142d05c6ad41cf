mod common;

use common::FakeBackend;
use reqwest::Client;
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn fetch_state(client: &Client, base_url: &str) -> Option<Value> {
    let response = client.get(format!("{base_url}/api/state")).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

const CHARTS: [&str; 8] = [
    "medals_by_country",
    "gender_distribution",
    "age_distribution",
    "medals_over_time",
    "top_sports",
    "avg_age_by_sport",
    "gender_over_time",
    "athletes_over_time",
];

fn fully_loaded(state: &Value) -> bool {
    let loaded = |slot: &Value| slot["state"] == "loaded";
    state["model_info"].is_object()
        && state["options"]["years"].as_array().is_some_and(|years| !years.is_empty())
        && state["options"]["sports"].as_array().is_some_and(|sports| !sports.is_empty())
        && state["options"]["countries"].as_array().is_some_and(|countries| !countries.is_empty())
        && loaded(&state["medals_by_type"])
        && CHARTS.iter().all(|chart| loaded(&state["charts"][*chart]))
}

/// Waits until the server answers and its initial data load has settled.
async fn wait_until_loaded(base_url: &str) -> Value {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(state) = fetch_state(&client, base_url).await {
            if fully_loaded(&state) {
                return state;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not finish loading");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(api_url: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_olympix_dashboard"))
        .env("PORT", port.to_string())
        .env("OLYMPIX_API_URL", api_url)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_loaded(&base_url).await;

    TestServer { base_url, child }
}

#[tokio::test]
async fn http_tab_switch_renders_without_fetching() {
    let backend = FakeBackend::start().await;
    let server = spawn_server(&backend.base_url).await;
    let client = Client::new();
    let before = backend.request_count();

    let html = client
        .get(format!("{}/tab/predict", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<a class="tab active" href="/tab/predict""#));
    assert!(html.contains("Medal Probability Predictor"));
    assert!(html.contains("MODEL ACC"));

    let html = client
        .get(format!("{}/tab/trends", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"id="medals-over-time" data-state="loaded""#));
    assert_eq!(backend.request_count(), before);

    let response = client
        .get(format!("{}/tab/medals", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_predict_form_and_filters() {
    let backend = FakeBackend::start().await;
    let server = spawn_server(&backend.base_url).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/predict", server.base_url))
        .form(&[("age", "33"), ("sex", "F"), ("height", "170"), ("weight", "64")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = fetch_state(&client, &server.base_url).await.expect("state");
    assert_eq!(state["prediction"]["result"], 33.0);
    assert!(state["prediction"]["error"].is_null());
    assert_eq!(state["prediction"]["input"]["sex"], "F");

    let response = client
        .post(format!("{}/filters", server.base_url))
        .form(&[("country", "Jamaica"), ("season", "Winter"), ("sport", "")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = fetch_state(&client, &server.base_url).await.expect("state");
    assert_eq!(state["filters"]["country"], "Jamaica");
    assert_eq!(state["filters"]["season"], "Winter");
    assert_eq!(state["charts"]["medals_by_country"]["data"]["Jamaica"], 5.0);
    assert_eq!(state["charts"]["country_stats"]["state"], "loaded");

    let winter = backend.requests_to("/gender-over-time");
    let last = winter.last().expect("gender-over-time request");
    assert_eq!(last.query.get("season").map(String::as_str), Some("Winter"));

    let response = client
        .post(format!("{}/filters/reset", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let state = fetch_state(&client, &server.base_url).await.expect("state");
    assert_eq!(state["filters"]["country"], "");
    assert!(state["filters"]["season"].is_null());
    let medals = &state["charts"]["medals_by_country"]["data"];
    assert_eq!(medals["USA"], 120.0);
    assert_eq!(medals["GBR"], 80.0);
    assert!(medals.get("Jamaica").is_none());
    assert_eq!(state["charts"]["country_stats"]["state"], "empty");

    let response = client
        .post(format!("{}/api/predict", server.base_url))
        .json(&serde_json::json!({"age": 5, "sex": "M", "height": 175, "weight": 70}))
        .send()
        .await
        .unwrap();
    let prediction: Value = response.json().await.unwrap();
    assert_eq!(prediction["input"]["age"], 14);
    assert_eq!(prediction["result"], 14.0);
}
