//! [`SqliteStore`] — the SQLite implementation of [`InquiryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use biolab_core::{
  inquiry::{Inquiry, InquiryStatus, NewInquiry},
  post::{NewPost, Post},
  store::InquiryStore,
};

use crate::{
  Error, Result,
  encode::{
    INQUIRY_COLUMNS, POST_COLUMNS, RawInquiry, RawPost, encode_dt,
    encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A BioLab inquiry store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a post by primary key; used after updates to return the fresh row.
  async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }
}

// ─── InquiryStore impl ───────────────────────────────────────────────────────

impl InquiryStore for SqliteStore {
  type Error = Error;

  // ── Inquiries ─────────────────────────────────────────────────────────────

  async fn create_inquiry(&self, input: NewInquiry) -> Result<Inquiry> {
    // Constraints are checked before anything touches the database.
    input.validate().map_err(biolab_core::Error::from)?;

    let inquiry = Inquiry {
      inquiry_id:   Uuid::new_v4(),
      name:         input.name,
      email:        input.email,
      phone:        input.phone,
      university:   input.university,
      subject:      input.subject,
      service_type: input.service_type,
      message:      input.message,
      status:       InquiryStatus::New,
      created_at:   Utc::now(),
    };

    let id_str     = encode_uuid(inquiry.inquiry_id);
    let status_str = encode_status(inquiry.status).to_owned();
    let at_str     = encode_dt(inquiry.created_at);
    let row        = inquiry.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO inquiries (
             inquiry_id, name, email, phone, university, subject,
             service_type, message, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            row.name,
            row.email,
            row.phone,
            row.university,
            row.subject,
            row.service_type,
            row.message,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(inquiry)
  }

  async fn get_inquiry(&self, id: Uuid) -> Result<Option<Inquiry>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInquiry> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE inquiry_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawInquiry::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInquiry::into_inquiry).transpose()
  }

  async fn list_inquiries(
    &self,
    status: Option<InquiryStatus>,
  ) -> Result<Vec<Inquiry>> {
    let status_str = status.map(encode_status).map(str::to_owned);

    let raws: Vec<RawInquiry> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries
             WHERE status = ?1
             ORDER BY created_at DESC"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![s], RawInquiry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries ORDER BY created_at DESC"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map([], RawInquiry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInquiry::into_inquiry).collect()
  }

  async fn update_inquiry_status(
    &self,
    id: Uuid,
    status: InquiryStatus,
  ) -> Result<Option<Inquiry>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();

    // Unconditional set: the status is a flat label, so no current-state
    // check is performed.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE inquiries SET status = ?2 WHERE inquiry_id = ?1",
          rusqlite::params![id_str, status_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_inquiry(id).await
  }

  async fn count_inquiries(&self, status: Option<InquiryStatus>) -> Result<u64> {
    let status_str = status.map(encode_status).map(str::to_owned);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let count = if let Some(s) = status_str {
          conn.query_row(
            "SELECT COUNT(*) FROM inquiries WHERE status = ?1",
            rusqlite::params![s],
            |row| row.get(0),
          )?
        } else {
          conn.query_row("SELECT COUNT(*) FROM inquiries", [], |row| row.get(0))?
        };
        Ok(count)
      })
      .await?;

    Ok(count as u64)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn add_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:      Uuid::new_v4(),
      slug:         input.slug,
      title_bg:     input.title_bg,
      title_en:     input.title_en,
      excerpt_bg:   input.excerpt_bg,
      excerpt_en:   input.excerpt_en,
      body_bg:      input.body_bg,
      body_en:      input.body_en,
      author:       input.author,
      published:    false,
      published_at: None,
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(post.post_id);
    let at_str = encode_dt(post.created_at);
    let row    = post.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (
             post_id, slug, title_bg, title_en, excerpt_bg, excerpt_en,
             body_bg, body_en, author, published, published_at, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, NULL, ?10)",
          rusqlite::params![
            id_str,
            row.slug,
            row.title_bg,
            row.title_en,
            row.excerpt_bg,
            row.excerpt_en,
            row.body_bg,
            row.body_en,
            row.author,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn set_post_published(
    &self,
    id: Uuid,
    published: bool,
  ) -> Result<Option<Post>> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        let n = if published {
          // COALESCE keeps the original timestamp on re-publish.
          conn.execute(
            "UPDATE posts
             SET published = 1, published_at = COALESCE(published_at, ?2)
             WHERE post_id = ?1",
            rusqlite::params![id_str, now_str],
          )?
        } else {
          conn.execute(
            "UPDATE posts SET published = 0 WHERE post_id = ?1",
            rusqlite::params![id_str],
          )?
        };
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_post_by_id(id).await
  }

  async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
    let slug = slug.to_owned();

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![slug], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, published_only: bool) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = if published_only {
          format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE published = 1
             ORDER BY published_at DESC"
          )
        } else {
          format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC")
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn count_published_posts(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM posts WHERE published = 1",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
