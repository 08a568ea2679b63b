//! The `FeedingStore` trait and supporting query types.
//!
//! Implemented by storage backends (e.g. `kibble-store-sqlite`). The API and
//! server crates depend on this abstraction, not on a concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  feeding::{FeedingEvent, PreparedFeeding},
  subject::Subject,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`FeedingStore::list_feedings`]. The default lists every
/// feeding.
#[derive(Debug, Clone, Default)]
pub struct FeedingQuery {
  pub subject: Option<Subject>,
  /// Inclusive lower bound on the feeding date.
  pub from:    Option<NaiveDate>,
  /// Inclusive upper bound on the feeding date.
  pub to:      Option<NaiveDate>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a feeding store backend.
///
/// Feedings are append-only: there is no update or delete.
pub trait FeedingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a prepared feeding and return the stored event. The identifier
  /// and `recorded_at` timestamp are assigned by the store.
  fn record_feeding(
    &self,
    input: PreparedFeeding,
  ) -> impl Future<Output = Result<FeedingEvent, Self::Error>> + Send + '_;

  /// Retrieve a feeding by id. Returns `None` if not found.
  fn get_feeding(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FeedingEvent>, Self::Error>> + Send + '_;

  /// List feedings matching `query`, ordered by date, then by recording time.
  fn list_feedings<'a>(
    &'a self,
    query: &'a FeedingQuery,
  ) -> impl Future<Output = Result<Vec<FeedingEvent>, Self::Error>> + Send + 'a;
}
