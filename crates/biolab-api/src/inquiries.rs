//! Handlers for the authenticated inquiry-triage endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/api/admin/inquiries` | Optional `?status=NEW\|IN_PROGRESS\|COMPLETED\|ARCHIVED` |
//! | `PATCH` | `/api/admin/inquiries/{id}` | Body: `{"status":"IN_PROGRESS"}`; 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use biolab_core::{
  inquiry::{Inquiry, InquiryStatus},
  store::InquiryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Operator, error::ApiError, mail::Mailer};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<InquiryStatus>,
}

/// `GET /api/admin/inquiries[?status=<status>]` — newest first.
pub async fn list<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Inquiry>>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let inquiries = state
    .store
    .list_inquiries(params.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(inquiries))
}

// ─── Status update ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub status: InquiryStatus,
}

/// `PATCH /api/admin/inquiries/{id}` — body: `{"status":"IN_PROGRESS"}`
///
/// The status is a flat label: any value may be set regardless of the
/// record's current status.
pub async fn update_status<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Inquiry>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let updated = state
    .store
    .update_inquiry_status(id, body.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("inquiry {id} not found")))?;

  tracing::info!(inquiry = %id, status = %body.status, "inquiry status updated");
  Ok(Json(updated))
}
