//! Plain-text rendering of feedings, dashboards and the energy table.

use std::fmt::Write as _;

use kibble_core::{
  aggregate::Dashboard,
  feeding::{FeedingEvent, date_label},
  food::EnergyEntries,
};

/// Series cell: `-` for a gap, otherwise at most two decimals.
fn cell(value: Option<f64>) -> String {
  match value {
    None => "-".to_owned(),
    Some(v) => {
      let s = format!("{v:.2}");
      s.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
  }
}

pub fn render_history(events: &[FeedingEvent]) -> String {
  let mut out = String::new();
  if events.is_empty() {
    out.push_str("No feedings recorded.\n");
    return out;
  }
  let _ = writeln!(
    out,
    "{:<10}  {:<10}  {:<4}  {:<26}  {:>8}  {:>9}",
    "Date", "Subject", "Type", "Food", "Grams", "kcal"
  );
  for e in events {
    let _ = writeln!(
      out,
      "{:<10}  {:<10}  {:<4}  {:<26}  {:>8}  {:>9}",
      date_label(e.date),
      e.subject.as_str(),
      e.food_class.as_str(),
      e.food_id,
      cell(Some(e.quantity_grams)),
      cell(Some(e.kcal_total)),
    );
  }
  out
}

pub fn render_dashboard(d: &Dashboard) -> String {
  let mut out = String::new();

  if d.labels.is_empty() {
    out.push_str("No feedings recorded.\n");
  } else {
    let headers: Vec<String> = d
      .series
      .iter()
      .flat_map(|s| [format!("{} g", s.subject), format!("{} kcal", s.subject)])
      .collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(8)).collect();

    let _ = write!(out, "{:<10}", "Date");
    for (h, w) in headers.iter().zip(&widths) {
      let _ = write!(out, "  {h:>w$}");
    }
    out.push('\n');

    for (i, label) in d.labels.iter().enumerate() {
      let _ = write!(out, "{label:<10}");
      let cells = d
        .series
        .iter()
        .flat_map(|s| [cell(s.grams[i]), cell(s.kcal[i])]);
      for (c, w) in cells.zip(&widths) {
        let _ = write!(out, "  {c:>w$}");
      }
      out.push('\n');
    }
  }

  let _ = writeln!(
    out,
    "\nAverages per dry feeding, up to {}:",
    date_label(d.today)
  );
  for subject in &d.averages {
    for avg in &subject.averages {
      let _ = writeln!(
        out,
        "  {:<10} {:>2} days: {:>6.1} g  {:>7.1} kcal  ({} feedings)",
        subject.subject.as_str(),
        avg.days,
        avg.avg_grams,
        avg.avg_kcal,
        avg.feedings,
      );
    }
  }
  out
}

pub fn render_foods(entries: &EnergyEntries) -> String {
  let mut out = String::from("Dry food (kcal/kg)\n");
  for e in &entries.dry {
    let _ = writeln!(out, "  {:<26} {:>7.1}", e.id, e.kcal_per_kg.0);
  }
  out.push_str("Wet food (kcal/100 g)\n");
  for e in &entries.wet {
    let _ = writeln!(out, "  {:<26} {:>7.1}", e.id, e.kcal_per_100g.0);
  }
  out
}
