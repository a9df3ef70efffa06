//! Handler for the authenticated dashboard-stats endpoint.

use axum::{Json, extract::State};
use biolab_core::{
  inquiry::{Inquiry, InquiryStatus},
  store::InquiryStore,
};
use serde::Serialize;

use crate::{AppState, auth::Operator, error::ApiError, mail::Mailer};

/// Aggregate numbers shown on the admin dashboard — never stored, always
/// computed from the live store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_inquiries:  u64,
  pub new_inquiries:    u64,
  pub published_posts:  u64,
  /// The 5 most recent inquiries, newest first.
  pub recent_inquiries: Vec<Inquiry>,
}

/// `GET /api/admin/stats`
pub async fn dashboard<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let store = &state.store;

  let total_inquiries = store
    .count_inquiries(None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let new_inquiries = store
    .count_inquiries(Some(InquiryStatus::New))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let published_posts = store
    .count_published_posts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let mut recent_inquiries = store
    .list_inquiries(None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  recent_inquiries.truncate(5);

  Ok(Json(DashboardStats {
    total_inquiries,
    new_inquiries,
    published_posts,
    recent_inquiries,
  }))
}
