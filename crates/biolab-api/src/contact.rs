//! Handler for the public contact-submission endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use biolab_core::{inquiry::NewInquiry, store::InquiryStore};
use serde_json::json;

use crate::{
  AppState,
  error::ApiError,
  mail::{Mailer, notify_in_background},
};

/// `POST /api/contact`
///
/// The one unauthenticated write in the system. Validation is rejected
/// before persistence; notification starts only after the insert commits
/// and cannot fail the submission.
pub async fn submit<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<NewInquiry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InquiryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  body.validate()?;

  let inquiry = state
    .store
    .create_inquiry(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(inquiry = %inquiry.inquiry_id, "new inquiry submitted");
  notify_in_background(state.mailer.clone(), inquiry.clone());

  Ok((
    StatusCode::CREATED,
    Json(json!({ "success": true, "id": inquiry.inquiry_id })),
  ))
}
