//! Food classes, the static energy table, and the calorie calculator.
//!
//! Dry food is specified in kcal per kilogram, wet food in kcal per 100 g.
//! The two tables stay separate and typed; their units are
//! never normalised into one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  feeding::{NewFeeding, PreparedFeeding, coerce_grams},
};

// ─── FoodClass ───────────────────────────────────────────────────────────────

/// Which energy table applies to a feeding.
///
/// Parsing never fails: `"wet"` (or the legacy `"molhada"`) selects
/// [`FoodClass::Wet`], anything else falls back to [`FoodClass::Dry`]. The
/// same holds when deserialising, where `null` and non-string values are
/// read as dry too.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FoodClass {
  #[default]
  Dry,
  Wet,
}

impl FoodClass {
  pub fn parse(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "wet" | "molhada" => Self::Wet,
      _ => Self::Dry,
    }
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClass {
  Text(String),
  Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for FoodClass {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(match Option::<RawClass>::deserialize(deserializer)? {
      Some(RawClass::Text(t)) => Self::parse(&t),
      Some(RawClass::Other(_)) | None => Self::Dry,
    })
  }
}

// ─── Catalogue ───────────────────────────────────────────────────────────────

/// Dry foods with a known energy density. The snake_case form of each
/// variant is its food identifier.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DryFood {
  GoldenGatosCastrados,
  PremierGatosCastrados,
  RoyalCaninSterilised,
  WhiskasAdultos,
}

/// Wet foods (sachets) with a known energy density.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum WetFood {
  WhiskasSacheCarne,
  GoldenSacheFrango,
  PremierSacheSalmao,
  RoyalCaninInstinctive,
}

/// Energy density of dry food.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KcalPerKg(pub f64);

/// Energy density of wet food.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KcalPer100g(pub f64);

impl KcalPerKg {
  pub fn kcal_for(self, grams: f64) -> f64 { (grams / 1000.0) * self.0 }
}

impl KcalPer100g {
  pub fn kcal_for(self, grams: f64) -> f64 { (grams / 100.0) * self.0 }
}

const DRY_DENSITIES: [(DryFood, KcalPerKg); 4] = [
  (DryFood::GoldenGatosCastrados, KcalPerKg(3650.0)),
  (DryFood::PremierGatosCastrados, KcalPerKg(3800.0)),
  (DryFood::RoyalCaninSterilised, KcalPerKg(3891.0)),
  (DryFood::WhiskasAdultos, KcalPerKg(3600.0)),
];

const WET_DENSITIES: [(WetFood, KcalPer100g); 4] = [
  (WetFood::WhiskasSacheCarne, KcalPer100g(75.0)),
  (WetFood::GoldenSacheFrango, KcalPer100g(68.0)),
  (WetFood::PremierSacheSalmao, KcalPer100g(80.0)),
  (WetFood::RoyalCaninInstinctive, KcalPer100g(84.0)),
];

// ─── Lookup results ──────────────────────────────────────────────────────────

/// Outcome of looking a food identifier up in the table for its class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Density {
  Dry(DryFood, KcalPerKg),
  Wet(WetFood, KcalPer100g),
  /// The identifier is not in the table for the requested class.
  Unknown,
}

/// Calories for one feeding, plus whether the food was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KcalComputation {
  pub kcal:       f64,
  pub food_known: bool,
}

// ─── EnergyTable ─────────────────────────────────────────────────────────────

/// One row of [`EnergyTable::entries`], used for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryEntry {
  pub id:          String,
  pub kcal_per_kg: KcalPerKg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WetEntry {
  pub id:            String,
  pub kcal_per_100g: KcalPer100g,
}

/// The full table in listing form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyEntries {
  pub dry: Vec<DryEntry>,
  pub wet: Vec<WetEntry>,
}

/// Immutable energy densities, built once at startup.
#[derive(Debug, Clone)]
pub struct EnergyTable {
  dry: BTreeMap<DryFood, KcalPerKg>,
  wet: BTreeMap<WetFood, KcalPer100g>,
}

impl Default for EnergyTable {
  fn default() -> Self { Self::builtin() }
}

impl EnergyTable {
  /// The hard-coded catalogue. Adding a food means adding a variant and a
  /// density above.
  pub fn builtin() -> Self {
    Self {
      dry: DRY_DENSITIES.into_iter().collect(),
      wet: WET_DENSITIES.into_iter().collect(),
    }
  }

  /// Resolve `food_id` against the table for `class`.
  pub fn density(&self, class: FoodClass, food_id: &str) -> Density {
    let food_id = food_id.trim();
    match class {
      FoodClass::Dry => food_id
        .parse::<DryFood>()
        .ok()
        .and_then(|f| self.dry.get(&f).map(|d| Density::Dry(f, *d)))
        .unwrap_or(Density::Unknown),
      FoodClass::Wet => food_id
        .parse::<WetFood>()
        .ok()
        .and_then(|f| self.wet.get(&f).map(|d| Density::Wet(f, *d)))
        .unwrap_or(Density::Unknown),
    }
  }

  /// Total calories for `quantity_grams` of `food_id`.
  ///
  /// The quantity is coerced with [`coerce_grams`]; an unknown food yields
  /// zero calories with `food_known == false`. No rounding is applied.
  pub fn compute_kcal(
    &self,
    class: FoodClass,
    food_id: &str,
    quantity_grams: f64,
  ) -> KcalComputation {
    let grams = coerce_grams(quantity_grams);
    match self.density(class, food_id) {
      Density::Dry(_, d) => KcalComputation { kcal: d.kcal_for(grams), food_known: true },
      Density::Wet(_, d) => KcalComputation { kcal: d.kcal_for(grams), food_known: true },
      Density::Unknown => KcalComputation { kcal: 0.0, food_known: false },
    }
  }

  /// Compute calories for a submitted feeding. This is the only way to build
  /// a [`PreparedFeeding`].
  pub fn prepare(&self, input: NewFeeding) -> Result<PreparedFeeding> {
    if input.food_id.trim().is_empty() {
      return Err(Error::EmptyFoodId);
    }
    let grams = coerce_grams(input.quantity_grams);
    let computed = self.compute_kcal(input.food_class, &input.food_id, grams);
    Ok(PreparedFeeding::new(input, grams, computed.kcal, computed.food_known))
  }

  pub fn entries(&self) -> EnergyEntries {
    EnergyEntries {
      dry: self
        .dry
        .iter()
        .map(|(f, d)| DryEntry { id: f.to_string(), kcal_per_kg: *d })
        .collect(),
      wet: self
        .wet
        .iter()
        .map(|(f, d)| WetEntry { id: f.to_string(), kcal_per_100g: *d })
        .collect(),
    }
  }
}
