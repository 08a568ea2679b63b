//! `kibble` — command-line client for the Kibble feeding tracker.
//!
//! # Usage
//!
//! ```
//! kibble log --subject Marte --food whiskas_adultos --grams 40
//! kibble log --subject Venus --food whiskas_sache_carne --grams 85 --class wet
//! kibble report
//! kibble --url http://feeder.local:3000 history --subject Marte
//! ```

mod client;
mod report;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, FeedingSubmission};
use kibble_core::{
  aggregate,
  feeding::{parse_date, parse_grams},
  food::FoodClass,
  subject::Subject,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kibble", about = "Record and review pet feedings")]
struct Args {
  /// Path to a TOML config file (url, subjects).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the kibble server (default: http://localhost:3000).
  #[arg(long, env = "KIBBLE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a feeding, then print the refreshed dashboard.
  Log {
    #[arg(long)]
    subject: String,
    /// Food identifier from the energy table.
    #[arg(long)]
    food:    String,
    /// Quantity in grams; unparseable input counts as zero.
    #[arg(long)]
    grams:   String,
    /// `dry` or `wet`.
    #[arg(long, default_value = "dry")]
    class:   String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`; defaults to today.
    #[arg(long)]
    date:    Option<String>,
  },
  /// List recorded feedings.
  History {
    #[arg(long)]
    subject: Option<String>,
  },
  /// Print daily series and rolling averages.
  Report {
    /// Reference day for the averages; defaults to today.
    #[arg(long)]
    today: Option<String>,
  },
  /// Print the built-in energy table.
  Foods,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  subjects: Vec<String>,
}

fn configured_subjects(names: &[String]) -> Result<Vec<Subject>> {
  let names: Vec<&str> = if names.is_empty() {
    vec!["Marte", "Venus"]
  } else {
    names.iter().map(String::as_str).collect()
  };
  let mut out: Vec<Subject> = Vec::with_capacity(names.len());
  for name in names {
    let subject = Subject::new(name).context("invalid subject in config file")?;
    if !out.contains(&subject) {
      out.push(subject);
    }
  }
  Ok(out)
}

fn today_or(arg: Option<&str>) -> Result<NaiveDate> {
  match arg {
    Some(s) => Ok(parse_date(s)?),
    None => Ok(Local::now().date_naive()),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_owned()),
  };
  let subjects = configured_subjects(&file_cfg.subjects)?;
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Log { subject, food, grams, class, date } => {
      let submission = FeedingSubmission {
        subject:        Subject::new(&subject)?,
        date:           today_or(date.as_deref())?,
        food_class:     FoodClass::parse(&class),
        food_id:        food.trim().to_owned(),
        quantity_grams: parse_grams(&grams),
      };

      let receipt = client
        .record_feeding(&submission)
        .await
        .context("could not record the feeding")?;
      let fed = &receipt.feeding;
      println!(
        "Recorded {} g of {} for {}: {:.1} kcal",
        fed.quantity_grams, fed.food_id, fed.subject, fed.kcal_total
      );
      if !receipt.food_known {
        eprintln!(
          "warning: {} food `{}` is not in the energy table; counted as 0 kcal",
          fed.food_class.as_str(),
          fed.food_id
        );
      }

      match client.list_feedings(None).await {
        Ok(events) => {
          let view = aggregate::dashboard(&events, &subjects, Local::now().date_naive());
          print!("\n{}", report::render_dashboard(&view));
        }
        Err(e) => tracing::error!(error = %e, "failed to refresh feedings"),
      }
    }

    Command::History { subject } => {
      let subject = subject.as_deref().map(Subject::new).transpose()?;
      let events = client.list_feedings(subject.as_ref()).await?;
      print!("{}", report::render_history(&events));
    }

    Command::Report { today } => {
      let today = today_or(today.as_deref())?;
      let events = client.list_feedings(None).await?;
      print!("{}", report::render_dashboard(&aggregate::dashboard(&events, &subjects, today)));
    }

    Command::Foods => {
      print!("{}", report::render_foods(&client.foods().await?));
    }
  }

  Ok(())
}
