//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, statuses as their wire names (`NEW`, `IN_PROGRESS`, ...), and the
//! published flag as a 0/1 integer.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use biolab_core::{
  inquiry::{Inquiry, InquiryStatus},
  post::Post,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── InquiryStatus ───────────────────────────────────────────────────────────

pub fn encode_status(status: InquiryStatus) -> &'static str { status.as_str() }

pub fn decode_status(s: &str) -> Result<InquiryStatus> {
  Ok(s.parse::<InquiryStatus>()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `inquiries` row.
pub struct RawInquiry {
  pub inquiry_id:   String,
  pub name:         String,
  pub email:        String,
  pub phone:        Option<String>,
  pub university:   Option<String>,
  pub subject:      Option<String>,
  pub service_type: Option<String>,
  pub message:      String,
  pub status:       String,
  pub created_at:   String,
}

/// Column list matching [`RawInquiry::from_row`].
pub const INQUIRY_COLUMNS: &str = "inquiry_id, name, email, phone, \
   university, subject, service_type, message, status, created_at";

impl RawInquiry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      inquiry_id:   row.get(0)?,
      name:         row.get(1)?,
      email:        row.get(2)?,
      phone:        row.get(3)?,
      university:   row.get(4)?,
      subject:      row.get(5)?,
      service_type: row.get(6)?,
      message:      row.get(7)?,
      status:       row.get(8)?,
      created_at:   row.get(9)?,
    })
  }

  pub fn into_inquiry(self) -> Result<Inquiry> {
    Ok(Inquiry {
      inquiry_id:   decode_uuid(&self.inquiry_id)?,
      name:         self.name,
      email:        self.email,
      phone:        self.phone,
      university:   self.university,
      subject:      self.subject,
      service_type: self.service_type,
      message:      self.message,
      status:       decode_status(&self.status)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:      String,
  pub slug:         String,
  pub title_bg:     String,
  pub title_en:     String,
  pub excerpt_bg:   Option<String>,
  pub excerpt_en:   Option<String>,
  pub body_bg:      String,
  pub body_en:      String,
  pub author:       Option<String>,
  pub published:    i64,
  pub published_at: Option<String>,
  pub created_at:   String,
}

/// Column list matching [`RawPost::from_row`].
pub const POST_COLUMNS: &str = "post_id, slug, title_bg, title_en, \
   excerpt_bg, excerpt_en, body_bg, body_en, author, published, \
   published_at, created_at";

impl RawPost {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:      row.get(0)?,
      slug:         row.get(1)?,
      title_bg:     row.get(2)?,
      title_en:     row.get(3)?,
      excerpt_bg:   row.get(4)?,
      excerpt_en:   row.get(5)?,
      body_bg:      row.get(6)?,
      body_en:      row.get(7)?,
      author:       row.get(8)?,
      published:    row.get(9)?,
      published_at: row.get(10)?,
      created_at:   row.get(11)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:      decode_uuid(&self.post_id)?,
      slug:         self.slug,
      title_bg:     self.title_bg,
      title_en:     self.title_en,
      excerpt_bg:   self.excerpt_bg,
      excerpt_en:   self.excerpt_en,
      body_bg:      self.body_bg,
      body_en:      self.body_en,
      author:       self.author,
      published:    self.published != 0,
      published_at: self.published_at.as_deref().map(decode_dt).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
