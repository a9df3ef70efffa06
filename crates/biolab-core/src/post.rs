//! Post — a bilingual blog entry.
//!
//! Read-mostly: the only mutation is the published flag. Publishing stamps
//! `published_at` on the first transition; unpublishing leaves it in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted blog entry with Bulgarian and English content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub post_id:      Uuid,
  /// URL path segment; unique across all posts, drafts included.
  pub slug:         String,
  pub title_bg:     String,
  pub title_en:     String,
  pub excerpt_bg:   Option<String>,
  pub excerpt_en:   Option<String>,
  pub body_bg:      String,
  pub body_en:      String,
  pub author:       Option<String>,
  pub published:    bool,
  /// Set the first time the post is published; `None` for drafts.
  pub published_at: Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::InquiryStore::add_post`]. New posts always start
/// as unpublished drafts; `post_id` and `created_at` are set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
  pub slug:       String,
  pub title_bg:   String,
  pub title_en:   String,
  #[serde(default)]
  pub excerpt_bg: Option<String>,
  #[serde(default)]
  pub excerpt_en: Option<String>,
  pub body_bg:    String,
  pub body_en:    String,
  #[serde(default)]
  pub author:     Option<String>,
}
