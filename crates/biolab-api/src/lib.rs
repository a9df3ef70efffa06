//! HTTP boundary for the BioLab inquiry service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`InquiryStore`](biolab_core::store::InquiryStore): a public
//! contact-submission endpoint, public blog reads, and a session-gated admin
//! surface for triaging inquiries and managing posts.

pub mod auth;
pub mod contact;
pub mod error;
pub mod inquiries;
pub mod mail;
pub mod posts;
pub mod session;
pub mod stats;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use biolab_core::store::InquiryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, Sessions};
use mail::Mailer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// SMTP relay credentials. When the `[smtp]` table is absent, notification
/// is disabled and submissions proceed without it.
#[derive(Deserialize, Clone)]
pub struct SmtpConfig {
  pub host:           String,
  pub port:           u16,
  pub username:       String,
  pub password:       String,
  /// `From` mailbox for both outbound messages.
  pub from:           String,
  /// Mailbox that receives the operator alert for each submission.
  pub operator_email: String,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub auth_username:       String,
  pub auth_password_hash:  String,
  /// Lifetime of an admin session token, in minutes.
  #[serde(default = "default_session_ttl")]
  pub session_ttl_minutes: u64,
  pub smtp:                Option<SmtpConfig>,
}

fn default_session_ttl() -> u64 { 720 }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: InquiryStore, M: Mailer> {
  pub store:    Arc<S>,
  pub mailer:   M,
  pub auth:     Arc<AuthConfig>,
  pub sessions: Sessions,
  pub config:   Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S, M>(state: AppState<S, M>) -> Router
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  Router::new()
    // Public surface
    .route("/api/contact",              post(contact::submit::<S, M>))
    .route("/api/blog",                 get(posts::list_published::<S, M>))
    .route("/api/blog/{slug}",          get(posts::get_by_slug::<S, M>))
    .route("/api/admin/login",          post(session::login::<S, M>))
    // Authenticated admin surface
    .route("/api/admin/logout",         post(session::logout::<S, M>))
    .route("/api/admin/inquiries",      get(inquiries::list::<S, M>))
    .route("/api/admin/inquiries/{id}", patch(inquiries::update_status::<S, M>))
    .route("/api/admin/stats",          get(stats::dashboard::<S, M>))
    .route(
      "/api/admin/posts",
      get(posts::list_all::<S, M>).post(posts::create::<S, M>),
    )
    .route("/api/admin/posts/{id}",     patch(posts::set_published::<S, M>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use biolab_core::inquiry::Inquiry;
  use biolab_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  // ── Test mailers ──────────────────────────────────────────────────────────

  /// Captures `(kind, recipient)` pairs instead of delivering anything.
  #[derive(Clone, Default)]
  struct RecordingMailer {
    sent: Arc<Mutex<Vec<(&'static str, String)>>>,
  }

  impl mail::Mailer for RecordingMailer {
    type Error = std::convert::Infallible;

    async fn send_operator_alert(
      &self,
      inquiry: &Inquiry,
    ) -> Result<(), Self::Error> {
      self
        .sent
        .lock()
        .unwrap()
        .push(("operator", inquiry.email.clone()));
      Ok(())
    }

    async fn send_acknowledgment(
      &self,
      inquiry: &Inquiry,
    ) -> Result<(), Self::Error> {
      self
        .sent
        .lock()
        .unwrap()
        .push(("acknowledgment", inquiry.email.clone()));
      Ok(())
    }
  }

  /// Fails every send, for exercising the best-effort policy.
  #[derive(Clone)]
  struct FailingMailer;

  impl mail::Mailer for FailingMailer {
    type Error = std::io::Error;

    async fn send_operator_alert(&self, _: &Inquiry) -> Result<(), Self::Error> {
      Err(std::io::Error::other("smtp relay unreachable"))
    }

    async fn send_acknowledgment(&self, _: &Inquiry) -> Result<(), Self::Error> {
      Err(std::io::Error::other("smtp relay unreachable"))
    }
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn password_hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn server_config(hash: String) -> ServerConfig {
    ServerConfig {
      host:                "127.0.0.1".to_string(),
      port:                8080,
      store_path:          PathBuf::from(":memory:"),
      auth_username:       "admin".to_string(),
      auth_password_hash:  hash,
      session_ttl_minutes: 60,
      smtp:                None,
    }
  }

  async fn state_with_mailer<M: Mailer>(
    ttl_minutes: u64,
    mailer: M,
  ) -> AppState<SqliteStore, M> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hash = password_hash("secret");

    AppState {
      store:    Arc::new(store),
      mailer,
      auth:     Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash.clone(),
      }),
      sessions: Sessions::new(ttl_minutes),
      config:   Arc::new(server_config(hash)),
    }
  }

  async fn make_state() -> (AppState<SqliteStore, RecordingMailer>, RecordingMailer)
  {
    let mailer = RecordingMailer::default();
    let state = state_with_mailer(60, mailer.clone()).await;
    (state, mailer)
  }

  async fn request<S, M>(
    state: AppState<S, M>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value)
  where
    S: InquiryStore + Clone + Send + Sync + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    M: Mailer,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn login<S, M>(state: AppState<S, M>) -> String
  where
    S: InquiryStore + Clone + Send + Sync + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    M: Mailer,
  {
    let (status, body) = request(
      state,
      "POST",
      "/api/admin/login",
      None,
      Some(json!({ "username": "admin", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
  }

  fn ana() -> Value {
    json!({
      "name": "Ana Petrova",
      "email": "ana@example.com",
      "message": "Need help with ANOVA analysis",
      "privacy": true,
    })
  }

  fn post_body(slug: &str) -> Value {
    json!({
      "slug": slug,
      "titleBg": "Проверка на нормалност",
      "titleEn": "Checking normality",
      "bodyBg": "...",
      "bodyEn": "...",
    })
  }

  // ── Submission ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn valid_submission_returns_201_with_id() {
    let (state, _) = make_state().await;
    let (status, body) =
      request(state, "POST", "/api/contact", None, Some(ana())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    body["id"].as_str().unwrap().parse::<Uuid>().unwrap();
  }

  #[tokio::test]
  async fn submitted_inquiry_starts_as_new() {
    let (state, _) = make_state().await;
    request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;

    let token = login(state.clone()).await;
    let (status, body) = request(
      state,
      "GET",
      "/api/admin/inquiries",
      Some(&token),
      None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], json!("NEW"));
    assert!(records[0]["createdAt"].is_string());
  }

  #[tokio::test]
  async fn invalid_email_rejected_with_field_detail() {
    let (state, _) = make_state().await;
    let mut payload = ana();
    payload["email"] = json!("not-an-address");

    let (status, body) =
      request(state.clone(), "POST", "/api/contact", None, Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation failed"));
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == json!("email")));

    // Nothing was persisted.
    let token = login(state.clone()).await;
    let (_, body) =
      request(state, "GET", "/api/admin/inquiries", Some(&token), None).await;
    assert!(body.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn short_message_rejected() {
    let (state, _) = make_state().await;
    let mut payload = ana();
    payload["message"] = json!("too short");

    let (status, body) =
      request(state, "POST", "/api/contact", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == json!("message")));
  }

  // ── Notification ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submission_sends_exactly_two_messages() {
    let (state, mailer) = make_state().await;
    let (status, _) =
      request(state, "POST", "/api/contact", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);

    // The sends run on a background task; give it a moment.
    for _ in 0..100 {
      if mailer.sent.lock().unwrap().len() == 2 {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|(kind, _)| *kind == "operator"));
    assert!(
      sent
        .iter()
        .any(|(kind, to)| *kind == "acknowledgment" && to == "ana@example.com")
    );
  }

  #[tokio::test]
  async fn notification_failure_does_not_affect_submission() {
    let state = state_with_mailer(60, FailingMailer).await;

    let (status, body) =
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));

    // The record is durably there despite the dead relay.
    let token = login(state.clone()).await;
    let (_, body) =
      request(state, "GET", "/api/admin/inquiries", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  // ── Auth gating ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_surface_requires_session() {
    let (state, _) = make_state().await;

    for (method, uri) in [
      ("GET", "/api/admin/inquiries"),
      ("GET", "/api/admin/stats"),
      ("GET", "/api/admin/posts"),
      ("POST", "/api/admin/logout"),
    ] {
      let (status, _) = request(state.clone(), method, uri, None, None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");

      let (status, _) =
        request(state.clone(), method, uri, Some("bogus-token"), None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} bad token");
    }
  }

  #[tokio::test]
  async fn unauthenticated_update_does_not_mutate() {
    let (state, _) = make_state().await;
    let (_, body) =
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = request(
      state.clone(),
      "PATCH",
      &format!("/api/admin/inquiries/{id}"),
      None,
      Some(json!({ "status": "ARCHIVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Before/after snapshot: the record is untouched.
    let token = login(state.clone()).await;
    let (_, body) =
      request(state, "GET", "/api/admin/inquiries", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap()[0]["status"], json!("NEW"));
  }

  #[tokio::test]
  async fn login_rejects_wrong_password() {
    let (state, _) = make_state().await;
    let (status, _) = request(
      state,
      "POST",
      "/api/admin/login",
      None,
      Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn expired_token_is_rejected() {
    let mailer = RecordingMailer::default();
    let state = state_with_mailer(0, mailer).await;

    let token = login(state.clone()).await;
    let (status, _) =
      request(state, "GET", "/api/admin/inquiries", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn logout_revokes_the_token() {
    let (state, _) = make_state().await;
    let token = login(state.clone()).await;

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/admin/logout",
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      request(state, "GET", "/api/admin/inquiries", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Triage ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn triage_flow_end_to_end() {
    let (state, _) = make_state().await;

    let (status, body) =
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let token = login(state.clone()).await;

    let (status, body) = request(
      state.clone(),
      "PATCH",
      &format!("/api/admin/inquiries/{id}"),
      Some(&token),
      Some(json!({ "status": "IN_PROGRESS" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("IN_PROGRESS"));

    let (_, body) = request(
      state,
      "GET",
      "/api/admin/inquiries?status=IN_PROGRESS",
      Some(&token),
      None,
    )
    .await;
    assert!(!body.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn completed_may_move_back_to_new() {
    let (state, _) = make_state().await;
    let (_, body) =
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    let id = body["id"].as_str().unwrap().to_string();
    let token = login(state.clone()).await;

    for status_word in ["COMPLETED", "NEW"] {
      let (status, body) = request(
        state.clone(),
        "PATCH",
        &format!("/api/admin/inquiries/{id}"),
        Some(&token),
        Some(json!({ "status": status_word })),
      )
      .await;
      assert_eq!(status, StatusCode::OK);
      assert_eq!(body["status"], json!(status_word));
    }
  }

  #[tokio::test]
  async fn update_unknown_inquiry_returns_404() {
    let (state, _) = make_state().await;
    let token = login(state.clone()).await;

    let (status, _) = request(
      state,
      "PATCH",
      &format!("/api/admin/inquiries/{}", Uuid::new_v4()),
      Some(&token),
      Some(json!({ "status": "ARCHIVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stats_aggregate_counts() {
    let (state, _) = make_state().await;
    let token = login(state.clone()).await;

    for _ in 0..3 {
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    }
    let (_, listing) = request(
      state.clone(),
      "GET",
      "/api/admin/inquiries",
      Some(&token),
      None,
    )
    .await;
    let first = listing.as_array().unwrap()[0]["inquiryId"]
      .as_str()
      .unwrap()
      .to_string();
    request(
      state.clone(),
      "PATCH",
      &format!("/api/admin/inquiries/{first}"),
      Some(&token),
      Some(json!({ "status": "COMPLETED" })),
    )
    .await;

    let (_, created) = request(
      state.clone(),
      "POST",
      "/api/admin/posts",
      Some(&token),
      Some(post_body("normality-checks")),
    )
    .await;
    request(
      state.clone(),
      "PATCH",
      &format!("/api/admin/posts/{}", created["postId"].as_str().unwrap()),
      Some(&token),
      Some(json!({ "published": true })),
    )
    .await;
    request(
      state.clone(),
      "POST",
      "/api/admin/posts",
      Some(&token),
      Some(post_body("draft-post")),
    )
    .await;

    let (status, body) =
      request(state, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalInquiries"], json!(3));
    assert_eq!(body["newInquiries"], json!(2));
    assert_eq!(body["publishedPosts"], json!(1));
    assert_eq!(body["recentInquiries"].as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn recent_inquiries_capped_at_five() {
    let (state, _) = make_state().await;
    for _ in 0..6 {
      request(state.clone(), "POST", "/api/contact", None, Some(ana())).await;
    }

    let token = login(state.clone()).await;
    let (_, body) =
      request(state, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(body["recentInquiries"].as_array().unwrap().len(), 5);
  }

  // ── Blog ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn drafts_are_invisible_to_the_public() {
    let (state, _) = make_state().await;
    let token = login(state.clone()).await;

    let (status, created) = request(
      state.clone(),
      "POST",
      "/api/admin/posts",
      Some(&token),
      Some(post_body("normality-checks")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["published"], json!(false));

    let (_, body) = request(state.clone(), "GET", "/api/blog", None, None).await;
    assert!(body.as_array().unwrap().is_empty());
    let (status, _) = request(
      state.clone(),
      "GET",
      "/api/blog/normality-checks",
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Publishing makes the post visible and stamps publishedAt.
    let (_, published) = request(
      state.clone(),
      "PATCH",
      &format!("/api/admin/posts/{}", created["postId"].as_str().unwrap()),
      Some(&token),
      Some(json!({ "published": true })),
    )
    .await;
    assert!(published["publishedAt"].is_string());

    let (status, body) = request(
      state.clone(),
      "GET",
      "/api/blog/normality-checks",
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["titleEn"], json!("Checking normality"));

    let (_, body) = request(state, "GET", "/api/blog", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }
}
