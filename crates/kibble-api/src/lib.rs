//! JSON REST API for Kibble.
//!
//! Exposes an axum [`Router`] backed by any [`kibble_core::store::FeedingStore`].
//! Transport concerns (listening, tracing layers) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kibble_api::api_router(state))
//! ```

pub mod dashboard;
pub mod error;
pub mod extract;
pub mod feedings;
pub mod foods;

use std::sync::Arc;

use axum::{Router, routing::get};
use kibble_core::{food::EnergyTable, store::FeedingStore, subject::Subject};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through the API handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  /// Immutable energy table, built once at startup.
  pub foods:    Arc<EnergyTable>,
  /// Subjects always shown on the dashboard, in display order.
  pub subjects: Arc<[Subject]>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, subjects: Vec<Subject>) -> Self {
    Self {
      store,
      foods: Arc::new(EnergyTable::builtin()),
      subjects: subjects.into(),
    }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      foods:    Arc::clone(&self.foods),
      subjects: Arc::clone(&self.subjects),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: FeedingStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/feedings", get(feedings::list::<S>).post(feedings::create::<S>))
    .route("/feedings/{id}", get(feedings::get_one::<S>))
    .route("/foods", get(foods::list::<S>))
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(state)
}
