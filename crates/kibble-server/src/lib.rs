//! HTTP server assembly for Kibble.
//!
//! Mounts the JSON API from [`kibble_api`] under `/api`, adds a health probe
//! and request tracing, and owns the server configuration.

use std::path::{Path, PathBuf};

use axum::{Router, routing::get};
use kibble_api::{ApiState, api_router};
use kibble_core::{store::FeedingStore, subject::Subject};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `kibble.toml` and
/// `KIBBLE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Subjects always shown on the dashboard, in display order.
  #[serde(default = "default_subjects")]
  pub subjects:   Vec<String>,
}

fn default_host() -> String { "0.0.0.0".into() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("kibble.db") }

fn default_subjects() -> Vec<String> { vec!["Marte".into(), "Venus".into()] }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
      subjects:   default_subjects(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `KIBBLE_`-prefixed
  /// environment variables. `KIBBLE_SUBJECTS` is comma-separated.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("KIBBLE")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("subjects"),
      )
      .build()?
      .try_deserialize()
  }

  /// The configured subjects as normalised keys, duplicates removed.
  pub fn subjects(&self) -> kibble_core::Result<Vec<Subject>> {
    let mut out: Vec<Subject> = Vec::with_capacity(self.subjects.len());
    for name in &self.subjects {
      let subject = Subject::new(name)?;
      if !out.contains(&subject) {
        out.push(subject);
      }
    }
    Ok(out)
  }

  /// `store_path` with a leading `~/` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: FeedingStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .route("/health", get(|| async { "ok" }))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use kibble_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    let subjects = ServerConfig::default().subjects().unwrap();
    ApiState::new(Arc::new(store), subjects)
  }

  async fn oneshot_raw(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn feeding(subject: &str, date: &str, class: &str, food: &str, grams: f64) -> Value {
    json!({
      "subject": subject,
      "date": date,
      "food_class": class,
      "food_id": food,
      "quantity_grams": grams,
    })
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let resp = oneshot_raw(make_state().await, "GET", "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Feedings ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submitted_kcal_is_replaced_by_server_value() {
    let state = make_state().await;
    let mut body = feeding("Marte", "2024-03-01", "dry", "whiskas_adultos", 50.0);
    body["kcal_total"] = json!(9999.0);

    let resp = oneshot_raw(state.clone(), "POST", "/api/feedings", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    let kcal = created["kcal_total"].as_f64().unwrap();
    assert!((kcal - 180.0).abs() < 1e-9, "kcal {kcal}");
    assert_eq!(created["food_known"], json!(true));

    let listed = json_body(oneshot_raw(state, "GET", "/api/feedings", None).await).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["kcal_total"].as_f64().unwrap(), kcal);
  }

  #[tokio::test]
  async fn unknown_food_is_accepted_with_zero_kcal() {
    let state = make_state().await;
    let body = feeding("Venus", "2024-03-01", "wet", "whiskas_adultos", 85.0);
    let resp = oneshot_raw(state, "POST", "/api/feedings", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["kcal_total"].as_f64().unwrap(), 0.0);
    assert_eq!(created["food_known"], json!(false));
  }

  #[tokio::test]
  async fn empty_subject_is_rejected() {
    let state = make_state().await;
    let body = feeding("  ", "2024-03-01", "dry", "whiskas_adultos", 40.0);
    let resp = oneshot_raw(state, "POST", "/api/feedings", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn null_or_numeric_food_class_is_recorded_as_dry() {
    let state = make_state().await;
    for class in [json!(null), json!(3)] {
      let mut body = feeding("Marte", "2024-03-01", "dry", "whiskas_adultos", 50.0);
      body["food_class"] = class;
      let resp = oneshot_raw(state.clone(), "POST", "/api/feedings", Some(body)).await;
      assert_eq!(resp.status(), StatusCode::CREATED);
      let created = json_body(resp).await;
      assert_eq!(created["food_class"], json!("dry"));
      assert_eq!(created["food_known"], json!(true));
    }
  }

  #[tokio::test]
  async fn malformed_bodies_get_json_400() {
    let state = make_state().await;
    let mut missing_food = feeding("Marte", "2024-03-01", "dry", "whiskas_adultos", 40.0);
    missing_food.as_object_mut().unwrap().remove("food_id");

    let resp = oneshot_raw(state.clone(), "POST", "/api/feedings", Some(missing_food)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let req = Request::builder()
      .method("POST")
      .uri("/api/feedings")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn malformed_id_gets_json_400() {
    let resp = oneshot_raw(make_state().await, "GET", "/api/feedings/not-a-uuid", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn malformed_query_gets_json_400() {
    let uri = "/api/feedings?subject=Marte&subject=Venus";
    let resp = oneshot_raw(make_state().await, "GET", uri, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn get_missing_feeding_returns_404() {
    let state = make_state().await;
    let uri = "/api/feedings/00000000-0000-4000-8000-000000000000";
    let resp = oneshot_raw(state, "GET", uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_one_returns_stored_feeding() {
    let state = make_state().await;
    let body = feeding("Marte", "2024-03-01", "dry", "golden_gatos_castrados", 40.0);
    let created =
      json_body(oneshot_raw(state.clone(), "POST", "/api/feedings", Some(body)).await).await;
    let id = created["id"].as_str().unwrap();

    let resp = oneshot_raw(state, "GET", &format!("/api/feedings/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["food_id"], json!("golden_gatos_castrados"));
  }

  #[tokio::test]
  async fn list_filters_by_subject_query() {
    let state = make_state().await;
    for (who, grams) in [("Marte", 40.0), ("Venus", 30.0), ("Marte", 45.0)] {
      let body = feeding(who, "2024-03-01", "dry", "whiskas_adultos", grams);
      oneshot_raw(state.clone(), "POST", "/api/feedings", Some(body)).await;
    }
    let listed =
      json_body(oneshot_raw(state, "GET", "/api/feedings?subject=Venus", None).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  // ── Foods ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn foods_lists_both_tables() {
    let resp = oneshot_raw(make_state().await, "GET", "/api/foods", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let foods = json_body(resp).await;
    assert!(!foods["dry"].as_array().unwrap().is_empty());
    assert!(foods["wet"][0]["kcal_per_100g"].is_number());
  }

  // ── Dashboard ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_reflects_new_feedings() {
    let state = make_state().await;
    for (who, date, class, food, grams) in [
      ("Marte", "05/01/2024", "dry", "whiskas_adultos", 40.0),
      ("Vênus", "20/12/2023", "dry", "whiskas_adultos", 30.0),
      ("Marte", "01/02/2024", "wet", "whiskas_sache_carne", 85.0),
    ] {
      let resp = oneshot_raw(
        state.clone(),
        "POST",
        "/api/feedings",
        Some(feeding(who, date, class, food, grams)),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = oneshot_raw(state, "GET", "/api/dashboard?today=2024-02-01", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let d = json_body(resp).await;
    assert_eq!(d["labels"], json!(["20/12/2023", "05/01/2024", "01/02/2024"]));
    assert_eq!(d["series"][0]["subject"], json!("Marte"));
    assert_eq!(d["series"][0]["grams"], json!([null, 40.0, null]));
    assert!(d["series"][0]["kcal"][2].is_number());

    // Only a wet feeding falls inside Marte's week.
    let week = &d["averages"][0]["averages"][0];
    assert_eq!(week["window"], json!("week"));
    assert_eq!(week["avg_grams"].as_f64().unwrap(), 0.0);
    assert_eq!(week["avg_kcal"].as_f64().unwrap(), 0.0);
  }

  #[tokio::test]
  async fn dashboard_rejects_bad_today() {
    let resp =
      oneshot_raw(make_state().await, "GET", "/api/dashboard?today=tomorrow", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn configured_subjects_are_normalised_and_deduplicated() {
    let cfg = ServerConfig {
      subjects: vec!["Marte".into(), "Vênus".into(), "Venus".into()],
      ..ServerConfig::default()
    };
    let names: Vec<String> = cfg.subjects().unwrap().into_iter().map(String::from).collect();
    assert_eq!(names, vec!["Marte", "Venus"]);
  }

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      let cfg = ServerConfig { store_path: "~/kibble.db".into(), ..ServerConfig::default() };
      assert_eq!(cfg.resolved_store_path(), PathBuf::from(home).join("kibble.db"));
    }
  }
}
