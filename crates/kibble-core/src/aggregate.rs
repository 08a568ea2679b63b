//! Time-series aggregation over feeding history.
//!
//! Everything here is a pure function of an event slice (and, for averages,
//! of "today"). Nothing is cached between calls; the [`dashboard`] is rebuilt
//! from the full history on every load.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  feeding::{FeedingEvent, date_label},
  subject::Subject,
};

// ─── Windows ─────────────────────────────────────────────────────────────────

/// A trailing averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
  Week,
  Month,
  Quarter,
}

impl Window {
  pub const ALL: [Window; 3] = [Window::Week, Window::Month, Window::Quarter];

  pub fn days(self) -> u64 {
    match self {
      Self::Week => 7,
      Self::Month => 30,
      Self::Quarter => 90,
    }
  }

  /// First day included in the window ending on `today`.
  pub fn start(self, today: NaiveDate) -> NaiveDate {
    today
      .checked_sub_days(Days::new(self.days()))
      .unwrap_or(NaiveDate::MIN)
  }
}

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

// ─── Buckets ─────────────────────────────────────────────────────────────────

/// Per-day totals for one subject. `grams` counts dry food only and is `None`
/// when there was no dry feeding; `kcal` counts every feeding and is `None`
/// when there was no feeding at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
  pub date:    NaiveDate,
  pub subject: Subject,
  pub grams:   Option<f64>,
  pub kcal:    Option<f64>,
}

/// Distinct feeding dates across `events`, earliest first.
///
/// Ordering is by calendar date, never by the `DD/MM/YYYY` label.
pub fn date_axis<'a, I>(events: I) -> Vec<NaiveDate>
where
  I: IntoIterator<Item = &'a FeedingEvent>,
{
  events
    .into_iter()
    .map(|e| e.date)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Bucket `subject`'s feedings onto `dates`, one bucket per date.
pub fn daily_buckets(
  events: &[FeedingEvent],
  subject: &Subject,
  dates: &[NaiveDate],
) -> Vec<DailyBucket> {
  let mut totals: HashMap<NaiveDate, (Option<f64>, Option<f64>)> = HashMap::new();
  for event in events.iter().filter(|e| &e.subject == subject) {
    let (grams, kcal) = totals.entry(event.date).or_default();
    if event.is_dry() {
      *grams = Some(grams.unwrap_or(0.0) + event.quantity_grams);
    }
    *kcal = Some(kcal.unwrap_or(0.0) + event.kcal_total);
  }

  dates
    .iter()
    .map(|date| {
      let (grams, kcal) = totals.get(date).copied().unwrap_or_default();
      DailyBucket { date: *date, subject: subject.clone(), grams, kcal }
    })
    .collect()
}

/// Dry grams per date for `subject`; `None` marks a gap.
pub fn grams_series(
  events: &[FeedingEvent],
  subject: &Subject,
  dates: &[NaiveDate],
) -> Vec<Option<f64>> {
  daily_buckets(events, subject, dates)
    .into_iter()
    .map(|b| b.grams)
    .collect()
}

/// Calories per date for `subject`, dry and wet together; `None` marks a gap.
pub fn kcal_series(
  events: &[FeedingEvent],
  subject: &Subject,
  dates: &[NaiveDate],
) -> Vec<Option<f64>> {
  daily_buckets(events, subject, dates)
    .into_iter()
    .map(|b| b.kcal)
    .collect()
}

// ─── Averages ────────────────────────────────────────────────────────────────

/// Mean dry-food grams and calories per feeding over a window, rounded to one
/// decimal. Both are `0.0` when the window holds no dry feeding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAverage {
  pub window:    Window,
  pub days:      u64,
  pub feedings:  usize,
  pub avg_grams: f64,
  pub avg_kcal:  f64,
}

/// Average `subject`'s dry feedings dated within `[today - days, today]`.
/// Wet feedings never count towards an average.
pub fn window_average(
  events: &[FeedingEvent],
  subject: &Subject,
  window: Window,
  today: NaiveDate,
) -> WindowAverage {
  let start = window.start(today);
  let (count, grams, kcal) = events
    .iter()
    .filter(|e| &e.subject == subject && e.is_dry())
    .filter(|e| e.date >= start && e.date <= today)
    .fold((0usize, 0.0, 0.0), |(n, g, k), e| {
      (n + 1, g + e.quantity_grams, k + e.kcal_total)
    });

  let (avg_grams, avg_kcal) = if count == 0 {
    (0.0, 0.0)
  } else {
    (grams / count as f64, kcal / count as f64)
  };

  WindowAverage {
    window,
    days: window.days(),
    feedings: count,
    avg_grams: round1(avg_grams),
    avg_kcal: round1(avg_kcal),
  }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Chart-ready series for one subject, aligned with [`Dashboard::labels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSeries {
  pub subject: Subject,
  pub grams:   Vec<Option<f64>>,
  pub kcal:    Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAverages {
  pub subject:  Subject,
  /// One entry per [`Window::ALL`], in that order.
  pub averages: Vec<WindowAverage>,
}

/// Everything a renderer needs, computed from the full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub today:    NaiveDate,
  pub dates:    Vec<NaiveDate>,
  /// `dates` rendered as `DD/MM/YYYY`.
  pub labels:   Vec<String>,
  pub series:   Vec<SubjectSeries>,
  pub averages: Vec<SubjectAverages>,
}

/// Subjects to display: `configured` first, then any other subject present in
/// `events` in first-seen order.
pub fn displayed_subjects(
  events: &[FeedingEvent],
  configured: &[Subject],
) -> Vec<Subject> {
  let mut out: Vec<Subject> = Vec::with_capacity(configured.len());
  for subject in configured.iter().chain(events.iter().map(|e| &e.subject)) {
    if !out.contains(subject) {
      out.push(subject.clone());
    }
  }
  out
}

/// Recompute the full view model from `(events, subjects, today)`.
pub fn dashboard(
  events: &[FeedingEvent],
  configured: &[Subject],
  today: NaiveDate,
) -> Dashboard {
  let subjects = displayed_subjects(events, configured);
  let dates = date_axis(events.iter().filter(|e| subjects.contains(&e.subject)));
  let labels = dates.iter().copied().map(date_label).collect();

  let series = subjects
    .iter()
    .map(|subject| {
      let (grams, kcal) = daily_buckets(events, subject, &dates)
        .into_iter()
        .map(|b| (b.grams, b.kcal))
        .unzip();
      SubjectSeries { subject: subject.clone(), grams, kcal }
    })
    .collect();

  let averages = subjects
    .iter()
    .map(|subject| SubjectAverages {
      subject:  subject.clone(),
      averages: Window::ALL
        .iter()
        .map(|w| window_average(events, subject, *w, today))
        .collect(),
    })
    .collect();

  Dashboard { today, dates, labels, series, averages }
}
