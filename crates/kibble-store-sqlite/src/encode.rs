//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings and calendar dates are ISO `YYYY-MM-DD`,
//! so lexical column order equals chronological order. UUIDs are hyphenated
//! lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use kibble_core::{feeding::FeedingEvent, food::FoodClass, subject::Subject};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── FoodClass ───────────────────────────────────────────────────────────────

pub fn encode_food_class(c: FoodClass) -> &'static str { c.as_str() }

pub fn decode_food_class(s: &str) -> FoodClass { FoodClass::parse(s) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawFeeding`].
pub const FEEDING_COLUMNS: &str = "feeding_id, subject, fed_on, food_class, \
                                   food_id, quantity_grams, kcal_total, recorded_at";

/// Raw values read directly from a `feedings` row.
pub struct RawFeeding {
  pub feeding_id:     String,
  pub subject:        String,
  pub fed_on:         String,
  pub food_class:     String,
  pub food_id:        String,
  pub quantity_grams: f64,
  pub kcal_total:     f64,
  pub recorded_at:    String,
}

impl RawFeeding {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      feeding_id:     row.get(0)?,
      subject:        row.get(1)?,
      fed_on:         row.get(2)?,
      food_class:     row.get(3)?,
      food_id:        row.get(4)?,
      quantity_grams: row.get(5)?,
      kcal_total:     row.get(6)?,
      recorded_at:    row.get(7)?,
    })
  }

  pub fn into_event(self) -> Result<FeedingEvent> {
    Ok(FeedingEvent {
      id:             decode_uuid(&self.feeding_id)?,
      subject:        Subject::new(&self.subject)?,
      date:           decode_date(&self.fed_on)?,
      food_class:     decode_food_class(&self.food_class),
      food_id:        self.food_id,
      quantity_grams: self.quantity_grams,
      kcal_total:     self.kcal_total,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}
