//! Handler for `GET /foods`: the energy table in listing form.

use axum::{Json, extract::State};
use kibble_core::{food::EnergyEntries, store::FeedingStore};

use crate::ApiState;

/// `GET /foods` — `{"dry": [{id, kcal_per_kg}], "wet": [{id, kcal_per_100g}]}`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Json<EnergyEntries>
where
  S: FeedingStore,
{
  Json(state.foods.entries())
}
