//! Handler for `GET /dashboard`.
//!
//! Re-reads the full history on every request and rebuilds the view model
//! with [`kibble_core::aggregate::dashboard`]; nothing is cached.

use axum::{Json, extract::State};
use chrono::{Local, NaiveDate};
use kibble_core::{
  aggregate::{self, Dashboard},
  feeding::parse_date,
  store::{FeedingQuery, FeedingStore},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  /// Last day of every averaging window. Defaults to the server's local date.
  pub today: Option<String>,
}

impl DashboardParams {
  fn today(&self) -> Result<NaiveDate, ApiError> {
    match self.today.as_deref() {
      Some(s) => Ok(parse_date(s)?),
      None => Ok(Local::now().date_naive()),
    }
  }
}

/// `GET /dashboard[?today=YYYY-MM-DD]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: FeedingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let today = params.today()?;
  let events = state
    .store
    .list_feedings(&FeedingQuery::default())
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(feedings = events.len(), %today, "rebuilding dashboard");
  Ok(Json(aggregate::dashboard(&events, &state.subjects, today)))
}
