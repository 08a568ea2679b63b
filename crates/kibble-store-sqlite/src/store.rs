//! [`SqliteStore`] — the SQLite implementation of [`FeedingStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kibble_core::{
  feeding::{FeedingEvent, PreparedFeeding},
  store::{FeedingQuery, FeedingStore},
};

use crate::{
  Result,
  encode::{
    FEEDING_COLUMNS, RawFeeding, encode_date, encode_dt, encode_food_class,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kibble feeding store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`FeedingEvent`] into the `feedings` table.
  async fn insert_feeding(&self, event: &FeedingEvent) -> Result<()> {
    let id_str          = encode_uuid(event.id);
    let subject_str     = event.subject.as_str().to_owned();
    let fed_on_str      = encode_date(event.date);
    let food_class_str  = encode_food_class(event.food_class).to_owned();
    let food_id         = event.food_id.clone();
    let quantity_grams  = event.quantity_grams;
    let kcal_total      = event.kcal_total;
    let recorded_at_str = encode_dt(event.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feedings (
             feeding_id, subject, fed_on, food_class, food_id,
             quantity_grams, kcal_total, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            subject_str,
            fed_on_str,
            food_class_str,
            food_id,
            quantity_grams,
            kcal_total,
            recorded_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FeedingStore impl ───────────────────────────────────────────────────────

impl FeedingStore for SqliteStore {
  type Error = crate::Error;

  async fn record_feeding(&self, input: PreparedFeeding) -> Result<FeedingEvent> {
    let event = input.into_event(Uuid::new_v4(), Utc::now());
    self.insert_feeding(&event).await?;
    Ok(event)
  }

  async fn get_feeding(&self, id: Uuid) -> Result<Option<FeedingEvent>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFeeding> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {FEEDING_COLUMNS} FROM feedings WHERE feeding_id = ?1"),
            rusqlite::params![id_str],
            RawFeeding::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFeeding::into_event).transpose()
  }

  async fn list_feedings(&self, query: &FeedingQuery) -> Result<Vec<FeedingEvent>> {
    let subject_str = query.subject.as_ref().map(|s| s.as_str().to_owned());
    let from_str    = query.from.map(encode_date);
    let to_str      = query.to.map(encode_date);

    let raws: Vec<RawFeeding> = self
      .conn
      .call(move |conn| {
        // rowid follows insertion order, which breaks ties within a day.
        let mut stmt = conn.prepare(&format!(
          "SELECT {FEEDING_COLUMNS}
           FROM feedings
           WHERE (?1 IS NULL OR subject = ?1)
             AND (?2 IS NULL OR fed_on >= ?2)
             AND (?3 IS NULL OR fed_on <= ?3)
           ORDER BY fed_on ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![subject_str, from_str, to_str],
            RawFeeding::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFeeding::into_event).collect()
  }
}
