//! HTML front end: home page, single-city results and two-city comparison.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use serde::Deserialize;
use weather_core::{
    Units, WeatherError, WeatherProvider, compare, fetch_pair, provider::require_city,
};

use crate::render::{self, ComparisonContext, ResultsContext};

pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
}

pub fn build_app(provider: Arc<dyn WeatherProvider>) -> Router {
    let state = Arc::new(AppState { provider });

    Router::new()
        .route("/", get(home))
        .route("/results", get(results))
        .route("/comparison_results", get(comparison_results))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ResultsQuery {
    city: Option<String>,
    units: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComparisonQuery {
    city1: Option<String>,
    city2: Option<String>,
    units: Option<String>,
}

async fn home() -> Html<String> {
    Html(render::home_page())
}

async fn results(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ResultsQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected(rejection),
    };
    let outcome = async {
        let city = require_city(q.city.as_deref(), "city")?;
        let units = Units::from_token(q.units.as_deref());
        tracing::info!(%city, %units, "results");

        let snapshot = state.provider.current_weather(city, units).await?;
        Ok::<_, WeatherError>(render::results_page(&ResultsContext::new(&snapshot, &Local::now())))
    }
    .await;

    into_page(outcome)
}

async fn comparison_results(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected(rejection),
    };
    let outcome = async {
        let city1 = require_city(q.city1.as_deref(), "city1")?;
        let city2 = require_city(q.city2.as_deref(), "city2")?;
        let units = Units::from_token(q.units.as_deref());
        tracing::info!(%city1, %city2, %units, "comparison_results");

        let (first, second) = fetch_pair(state.provider.as_ref(), city1, city2, units).await?;
        let cmp = compare(&first, &second)?;
        let ctx = ComparisonContext::new(&first, &second, &cmp, &Local::now());
        Ok::<_, WeatherError>(render::comparison_page(&ctx))
    }
    .await;

    into_page(outcome)
}

fn into_page(outcome: Result<String, WeatherError>) -> Response {
    match outcome {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::warn!(error = %e, %status, "request failed");
            (status, Html(render::error_page(&e.to_string()))).into_response()
        }
    }
}

fn rejected(rejection: QueryRejection) -> Response {
    let status = rejection.status();
    let message = rejection.body_text();
    tracing::warn!(%message, %status, "query rejected");
    (status, Html(render::error_page(&message))).into_response()
}
