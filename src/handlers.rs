use crate::dashboard::{
    Action, Dashboard, Filters, PredictionView, PredictorInput, Season, Sex, Tab,
};
use crate::errors::AppError;
use crate::state::AppState;
use crate::ui::render_dashboard;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    pub age: u32,
    pub sex: String,
    pub height: u32,
    pub weight: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub sport: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.store.snapshot().await;
    Html(render_dashboard(&dashboard))
}

pub async fn get_state(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.store.snapshot().await)
}

pub async fn select_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab: Tab = tab.parse().map_err(AppError::bad_request)?;
    state.store.dispatch(Action::SelectTab(tab)).await;
    Ok(Redirect::to("/"))
}

pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Redirect, AppError> {
    let sex: Sex = form.sex.parse().map_err(AppError::bad_request)?;
    let input = PredictorInput::clamped(form.age, sex, form.height, form.weight);
    state.store.dispatch(Action::SubmitPrediction(input)).await;
    Ok(Redirect::to("/"))
}

pub async fn api_predict(
    State(state): State<AppState>,
    Json(input): Json<PredictorInput>,
) -> Json<PredictionView> {
    let input = PredictorInput::clamped(input.age, input.sex, input.height, input.weight);
    state.store.dispatch(Action::SubmitPrediction(input)).await;
    Json(state.store.snapshot().await.prediction)
}

pub async fn apply_filters(
    State(state): State<AppState>,
    Form(form): Form<FilterForm>,
) -> Result<Redirect, AppError> {
    let filters = Filters {
        country: form.country.trim().to_string(),
        season: Season::parse_optional(&form.season).map_err(AppError::bad_request)?,
        sport: form.sport.trim().to_string(),
    };
    state.store.dispatch(Action::SetFilters(filters)).await;
    Ok(Redirect::to("/"))
}

pub async fn reset_filters(State(state): State<AppState>) -> Redirect {
    state.store.dispatch(Action::ResetFilters).await;
    Redirect::to("/")
}
