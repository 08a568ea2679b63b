//! Feeding events — the unit of record.
//!
//! A feeding is immutable once stored. Its `kcal_total` is always derived by
//! the [`EnergyTable`](crate::food::EnergyTable); callers can only hand the
//! store a [`PreparedFeeding`], which nothing outside this crate can build.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use uuid::Uuid;

use crate::{Error, Result, food::FoodClass, subject::Subject};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Format used for display labels (day/month/year).
pub const LABEL_FORMAT: &str = "%d/%m/%Y";

/// Parse a calendar date given either as ISO `YYYY-MM-DD` or as a display
/// label `DD/MM/YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(s, LABEL_FORMAT))
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// Render `date` as a `DD/MM/YYYY` label.
pub fn date_label(date: NaiveDate) -> String {
  date.format(LABEL_FORMAT).to_string()
}

// ─── Quantities ──────────────────────────────────────────────────────────────

/// Clamp a raw quantity to a usable gram count: negative, NaN and infinite
/// values all become zero.
pub fn coerce_grams(raw: f64) -> f64 {
  if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

/// Parse a typed-in quantity. A comma decimal separator is accepted and
/// anything unparseable counts as zero.
pub fn parse_grams(text: &str) -> f64 {
  coerce_grams(text.trim().replace(',', ".").parse().unwrap_or(0.0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGrams {
  Number(f64),
  Text(String),
  Other(IgnoredAny),
}

/// Permissive serde adapter for gram quantities.
///
/// Accepts a JSON number or a numeric string; `null` and anything else
/// deserialise to `0.0`. Pair with `#[serde(default)]` to also cover a
/// missing field.
pub fn deserialize_grams<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<RawGrams>::deserialize(deserializer)?;
  let grams = match raw {
    Some(RawGrams::Number(n)) => n,
    Some(RawGrams::Text(t)) => parse_grams(&t),
    Some(RawGrams::Other(_)) | None => 0.0,
  };
  Ok(coerce_grams(grams))
}

// ─── NewFeeding ──────────────────────────────────────────────────────────────

/// A feeding as submitted, before calories are computed.
#[derive(Debug, Clone)]
pub struct NewFeeding {
  pub subject:        Subject,
  pub date:           NaiveDate,
  pub food_class:     FoodClass,
  pub food_id:        String,
  pub quantity_grams: f64,
}

// ─── PreparedFeeding ─────────────────────────────────────────────────────────

/// A feeding whose calories have been computed from the energy table.
///
/// Built only by [`EnergyTable::prepare`](crate::food::EnergyTable::prepare).
#[derive(Debug, Clone)]
pub struct PreparedFeeding {
  subject:        Subject,
  date:           NaiveDate,
  food_class:     FoodClass,
  food_id:        String,
  quantity_grams: f64,
  kcal_total:     f64,
  food_known:     bool,
}

impl PreparedFeeding {
  pub(crate) fn new(
    input: NewFeeding,
    quantity_grams: f64,
    kcal_total: f64,
    food_known: bool,
  ) -> Self {
    Self {
      subject: input.subject,
      date: input.date,
      food_class: input.food_class,
      food_id: input.food_id,
      quantity_grams,
      kcal_total,
      food_known,
    }
  }

  pub fn subject(&self) -> &Subject { &self.subject }

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn kcal_total(&self) -> f64 { self.kcal_total }

  /// `false` when the food id was absent from the energy table and the
  /// calories were therefore computed as zero.
  pub fn food_known(&self) -> bool { self.food_known }

  /// Attach the store-assigned identity and turn this into a stored event.
  pub fn into_event(self, id: Uuid, recorded_at: DateTime<Utc>) -> FeedingEvent {
    FeedingEvent {
      id,
      subject: self.subject,
      date: self.date,
      food_class: self.food_class,
      food_id: self.food_id,
      quantity_grams: self.quantity_grams,
      kcal_total: self.kcal_total,
      recorded_at,
    }
  }
}

// ─── FeedingEvent ────────────────────────────────────────────────────────────

/// A stored feeding. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingEvent {
  pub id:             Uuid,
  pub subject:        Subject,
  /// Calendar day of the feeding; no time component.
  pub date:           NaiveDate,
  pub food_class:     FoodClass,
  pub food_id:        String,
  pub quantity_grams: f64,
  /// Server-derived; see [`crate::food::EnergyTable::compute_kcal`].
  pub kcal_total:     f64,
  /// Server-assigned timestamp.
  pub recorded_at:    DateTime<Utc>,
}

impl FeedingEvent {
  pub fn is_dry(&self) -> bool { self.food_class == FoodClass::Dry }
}
