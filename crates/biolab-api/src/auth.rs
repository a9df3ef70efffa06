//! Admin credential verification and bearer-token sessions.
//!
//! The public site never authenticates. Operators log in once with a
//! username/password pair checked against a stored argon2 hash; the server
//! hands back a random token which gates every admin operation until it
//! expires or is revoked.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard},
};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};

use biolab_core::store::InquiryStore;

use crate::{AppState, error::ApiError, mail::Mailer};

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Verify a login attempt against the configured argon2 hash.
pub fn verify_credentials(
  username: &str,
  password: &str,
  config: &AuthConfig,
) -> Result<(), ApiError> {
  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// In-process table of live admin session tokens.
///
/// Cloning is cheap — the table is reference-counted. Tokens do not survive
/// a server restart; operators log in again.
#[derive(Clone)]
pub struct Sessions {
  ttl:   Duration,
  inner: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl Sessions {
  pub fn new(ttl_minutes: u64) -> Self {
    Self {
      ttl:   Duration::minutes(ttl_minutes as i64),
      inner: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  fn table(&self) -> MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
    // A poisoned lock only means another thread panicked mid-insert; the
    // map itself is still valid.
    self.inner.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Issue a fresh token for a successfully authenticated operator.
  pub fn issue(&self) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    self.table().insert(token.clone(), Utc::now() + self.ttl);
    token
  }

  /// Check a presented token, pruning expired entries as a side effect.
  pub fn verify(&self, token: &str) -> bool {
    let now = Utc::now();
    let mut table = self.table();
    table.retain(|_, expires| *expires > now);
    table.contains_key(token)
  }

  /// Drop a token, ending its session.
  pub fn revoke(&self, token: &str) {
    self.table().remove(token);
  }
}

// ─── Request gating ──────────────────────────────────────────────────────────

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
}

/// Verify the session token in `headers`. Runs before any protected
/// operation touches the store.
pub fn verify_session(
  headers: &HeaderMap,
  sessions: &Sessions,
) -> Result<(), ApiError> {
  let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
  if sessions.verify(token) {
    Ok(())
  } else {
    Err(ApiError::Unauthorized)
  }
}

/// Zero-size marker: present in the handler means the caller holds a live
/// admin session.
pub struct Operator;

impl<S, M> FromRequestParts<AppState<S, M>> for Operator
where
  S: InquiryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: Mailer,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M>,
  ) -> Result<Self, Self::Rejection> {
    verify_session(&parts.headers, &state.sessions)?;
    Ok(Operator)
  }
}
