//! Login and logout handlers for the admin session.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use biolab_core::store::InquiryStore;
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{Operator, bearer_token, verify_credentials},
  error::ApiError,
  mail::Mailer,
};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token: String,
}

/// `POST /api/admin/login` — body: `{"username":"...","password":"..."}`
pub async fn login<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  verify_credentials(&body.username, &body.password, &state.auth)?;

  let token = state.sessions.issue();
  tracing::info!(username = %body.username, "operator logged in");
  Ok(Json(LoginResponse { token }))
}

/// `POST /api/admin/logout` — revokes the presented token.
pub async fn logout<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
  headers: HeaderMap,
) -> StatusCode
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  if let Some(token) = bearer_token(&headers) {
    state.sessions.revoke(token);
  }
  StatusCode::NO_CONTENT
}
