//! The `InquiryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `biolab-store-sqlite`).
//! The HTTP layer (`biolab-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  inquiry::{Inquiry, InquiryStatus, NewInquiry},
  post::{NewPost, Post},
};

/// Abstraction over the persistence backend.
///
/// Inquiries are owned exclusively by the store: created once, mutated only
/// through [`update_inquiry_status`](InquiryStore::update_inquiry_status),
/// never deleted. Mutations targeting an unknown id return `Ok(None)` and
/// leave the store unchanged; the boundary layer turns that into a not-found
/// failure.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait InquiryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Inquiries ─────────────────────────────────────────────────────────

  /// Validate `input` and persist a new inquiry with `status = NEW` and a
  /// server-assigned `created_at`. Fails without touching the database if
  /// any submission constraint is violated.
  fn create_inquiry(
    &self,
    input: NewInquiry,
  ) -> impl Future<Output = Result<Inquiry, Self::Error>> + Send + '_;

  /// Retrieve an inquiry by id. Returns `None` if not found.
  fn get_inquiry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Inquiry>, Self::Error>> + Send + '_;

  /// List inquiries, optionally filtered by status, newest first.
  /// No pagination; expected volume is small.
  fn list_inquiries(
    &self,
    status: Option<InquiryStatus>,
  ) -> impl Future<Output = Result<Vec<Inquiry>, Self::Error>> + Send + '_;

  /// Set the status of the inquiry identified by `id` and return the
  /// updated record. Any status may be set regardless of the current one.
  /// Returns `None` if no record has that id.
  fn update_inquiry_status(
    &self,
    id: Uuid,
    status: InquiryStatus,
  ) -> impl Future<Output = Result<Option<Inquiry>, Self::Error>> + Send + '_;

  /// Count inquiries matching an optional status filter.
  fn count_inquiries(
    &self,
    status: Option<InquiryStatus>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new unpublished post.
  fn add_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Flip the published flag, stamping `published_at` on the first
  /// transition to published. Returns `None` if no post has that id.
  fn set_post_published(
    &self,
    id: Uuid,
    published: bool,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Look up a post by slug, published or not.
  fn get_post_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;

  /// List posts. With `published_only`, drafts are excluded and the order
  /// is `published_at` descending; otherwise `created_at` descending.
  fn list_posts(
    &self,
    published_only: bool,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Number of published posts; feeds the dashboard statistics.
  fn count_published_posts(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
