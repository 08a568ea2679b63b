//! Handlers for `/feedings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feedings` | Optional `subject`, `from`, `to` (inclusive dates) |
//! | `GET`  | `/feedings/{id}` | Single feeding; 404 if missing |
//! | `POST` | `/feedings` | Body: [`NewFeedingBody`]; returns 201 + [`CreatedFeeding`] |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use kibble_core::{
  feeding::{FeedingEvent, NewFeeding, deserialize_grams, parse_date},
  food::FoodClass,
  store::{FeedingQuery, FeedingStore},
  subject::Subject,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub subject: Option<String>,
  /// `YYYY-MM-DD` or `DD/MM/YYYY`.
  pub from:    Option<String>,
  pub to:      Option<String>,
}

impl TryFrom<ListParams> for FeedingQuery {
  type Error = kibble_core::Error;

  fn try_from(p: ListParams) -> Result<Self, Self::Error> {
    Ok(FeedingQuery {
      subject: p.subject.as_deref().map(Subject::new).transpose()?,
      from:    p.from.as_deref().map(parse_date).transpose()?,
      to:      p.to.as_deref().map(parse_date).transpose()?,
    })
  }
}

/// `GET /feedings[?subject=...][&from=...][&to=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<FeedingEvent>>, ApiError>
where
  S: FeedingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = FeedingQuery::try_from(params)?;
  let feedings = state
    .store
    .list_feedings(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(feedings))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /feedings/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FeedingEvent>, ApiError>
where
  S: FeedingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let feeding = state
    .store
    .get_feeding(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("feeding {id} not found")))?;
  Ok(Json(feeding))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /feedings`.
///
/// Has no `kcal_total` field; a value sent by the client is ignored and the
/// calories are computed from the energy table. A missing, `null` or
/// unrecognised `food_class` means dry.
#[derive(Debug, Deserialize)]
pub struct NewFeedingBody {
  pub subject:        String,
  /// `YYYY-MM-DD` or `DD/MM/YYYY`.
  pub date:           String,
  #[serde(default)]
  pub food_class:     FoodClass,
  pub food_id:        String,
  #[serde(default, deserialize_with = "deserialize_grams")]
  pub quantity_grams: f64,
}

impl TryFrom<NewFeedingBody> for NewFeeding {
  type Error = kibble_core::Error;

  fn try_from(b: NewFeedingBody) -> Result<Self, Self::Error> {
    Ok(NewFeeding {
      subject:        Subject::new(&b.subject)?,
      date:           parse_date(&b.date)?,
      food_class:     b.food_class,
      food_id:        b.food_id.trim().to_owned(),
      quantity_grams: b.quantity_grams,
    })
  }
}

/// Response of `POST /feedings`: the stored feeding plus whether its food was
/// found in the energy table.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedFeeding {
  #[serde(flatten)]
  pub feeding:    FeedingEvent,
  pub food_known: bool,
}

/// `POST /feedings` — returns 201 + [`CreatedFeeding`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewFeedingBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let prepared = state.foods.prepare(NewFeeding::try_from(body)?)?;
  let food_known = prepared.food_known();

  let feeding = state
    .store
    .record_feeding(prepared)
    .await
    .map_err(ApiError::store)?;

  if food_known {
    tracing::info!(
      id = %feeding.id,
      subject = %feeding.subject,
      kcal = feeding.kcal_total,
      "feeding recorded"
    );
  } else {
    tracing::warn!(
      id = %feeding.id,
      food_class = feeding.food_class.as_str(),
      food_id = %feeding.food_id,
      "food not in energy table; recorded with zero kcal"
    );
  }

  Ok((StatusCode::CREATED, Json(CreatedFeeding { feeding, food_known })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn body_ignores_client_kcal_and_coerces_grams() {
    let body: NewFeedingBody = serde_json::from_str(
      r#"{"subject":"Marte","date":"2024-03-01","food_class":"seca",
          "food_id":"whiskas_adultos","quantity_grams":"abc","kcal_total":9999}"#,
    )
    .unwrap();
    assert_eq!(body.food_class, FoodClass::Dry);
    assert_eq!(body.quantity_grams, 0.0);
  }

  #[test]
  fn body_reads_null_or_non_string_class_as_dry() {
    for class in ["null", "3", "true", r#"{"kind":"wet"}"#] {
      let body: NewFeedingBody = serde_json::from_str(&format!(
        r#"{{"subject":"Marte","date":"2024-03-01","food_class":{class},
            "food_id":"whiskas_adultos","quantity_grams":40}}"#
      ))
      .unwrap();
      assert_eq!(body.food_class, FoodClass::Dry, "food_class {class}");
    }
  }

  #[test]
  fn body_defaults_missing_class_to_dry() {
    let body: NewFeedingBody = serde_json::from_str(
      r#"{"subject":"Venus","date":"01/02/2024","food_id":"x","quantity_grams":30}"#,
    )
    .unwrap();
    let input = NewFeeding::try_from(body).unwrap();
    assert_eq!(input.food_class, FoodClass::Dry);
    assert_eq!(input.date.to_string(), "2024-02-01");
  }

  #[test]
  fn invalid_date_is_a_bad_request() {
    let body: NewFeedingBody = serde_json::from_str(
      r#"{"subject":"Venus","date":"soon","food_id":"x","quantity_grams":30}"#,
    )
    .unwrap();
    let err = ApiError::from(NewFeeding::try_from(body).unwrap_err());
    assert!(matches!(err, ApiError::BadRequest(_)));
  }

  #[test]
  fn list_params_parse_into_query() {
    let q = FeedingQuery::try_from(ListParams {
      subject: Some("Vênus".into()),
      from:    Some("2024-01-01".into()),
      to:      None,
    })
    .unwrap();
    assert_eq!(q.subject.unwrap().as_str(), "Venus");
    assert!(q.from.is_some());
    assert!(q.to.is_none());
  }
}
