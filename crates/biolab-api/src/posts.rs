//! Handlers for the public blog read surface and the authenticated post
//! management endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/api/blog` | Published posts, newest first |
//! | `GET`   | `/api/blog/{slug}` | 404 for unknown or unpublished slugs |
//! | `GET`   | `/api/admin/posts` | Full listing, drafts included |
//! | `POST`  | `/api/admin/posts` | Creates an unpublished draft |
//! | `PATCH` | `/api/admin/posts/{id}` | Body: `{"published":true}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use biolab_core::{
  post::{NewPost, Post},
  store::InquiryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Operator, error::ApiError, mail::Mailer};

// ─── Public reads ────────────────────────────────────────────────────────────

/// `GET /api/blog`
pub async fn list_published<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let posts = state
    .store
    .list_posts(true)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(posts))
}

/// `GET /api/blog/{slug}`
///
/// Drafts are invisible here: an unpublished slug is indistinguishable from
/// a missing one.
pub async fn get_by_slug<S, M>(
  State(state): State<AppState<S, M>>,
  Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let post = state
    .store
    .get_post_by_slug(&slug)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .filter(|p| p.published)
    .ok_or_else(|| ApiError::NotFound(format!("post {slug:?} not found")))?;
  Ok(Json(post))
}

// ─── Admin management ────────────────────────────────────────────────────────

/// `GET /api/admin/posts`
pub async fn list_all<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let posts = state
    .store
    .list_posts(false)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(posts))
}

/// `POST /api/admin/posts` — new posts always start as drafts.
pub async fn create<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
  Json(body): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let post = state
    .store
    .add_post(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Debug, Deserialize)]
pub struct PublishBody {
  pub published: bool,
}

/// `PATCH /api/admin/posts/{id}` — body: `{"published":true}`
pub async fn set_published<S, M>(
  _operator: Operator,
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PublishBody>,
) -> Result<Json<Post>, ApiError>
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  let post = state
    .store
    .set_post_published(id, body.published)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;
  Ok(Json(post))
}
