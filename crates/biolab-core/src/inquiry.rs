//! Inquiry — a single contact-form submission record.
//!
//! Inquiries are created exactly once by the public submission endpoint and
//! never deleted; archival is a status value, not removal. Triage state is a
//! flat four-value label on the record.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage label attached to an inquiry.
///
/// A flat enumeration, not a workflow state machine: any status may move to
/// any other status (including itself), there is no forbidden-transition
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
  New,
  InProgress,
  Completed,
  Archived,
}

impl InquiryStatus {
  /// All statuses, in triage order.
  pub const ALL: [InquiryStatus; 4] =
    [Self::New, Self::InProgress, Self::Completed, Self::Archived];

  /// The wire and database representation, e.g. `IN_PROGRESS`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "NEW",
      Self::InProgress => "IN_PROGRESS",
      Self::Completed => "COMPLETED",
      Self::Archived => "ARCHIVED",
    }
  }
}

impl fmt::Display for InquiryStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InquiryStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "NEW" => Ok(Self::New),
      "IN_PROGRESS" => Ok(Self::InProgress),
      "COMPLETED" => Ok(Self::Completed),
      "ARCHIVED" => Ok(Self::Archived),
      other => Err(Error::UnknownStatus(other.to_string())),
    }
  }
}

// ─── Inquiry ─────────────────────────────────────────────────────────────────

/// A persisted contact submission. `inquiry_id` and `created_at` never change
/// after creation; `status` is the only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
  pub inquiry_id:   Uuid,
  pub name:         String,
  pub email:        String,
  pub phone:        Option<String>,
  pub university:   Option<String>,
  pub subject:      Option<String>,
  pub service_type: Option<String>,
  pub message:      String,
  pub status:       InquiryStatus,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

// ─── NewInquiry ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::InquiryStore::create_inquiry`].
/// `inquiry_id`, `status`, and `created_at` are always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
  pub name:         String,
  pub email:        String,
  #[serde(default)]
  pub phone:        Option<String>,
  #[serde(default)]
  pub university:   Option<String>,
  #[serde(default)]
  pub subject:      Option<String>,
  #[serde(default)]
  pub service_type: Option<String>,
  pub message:      String,
  /// Privacy-policy consent; must be affirmatively `true`.
  pub privacy:      bool,
}

impl NewInquiry {
  /// Check all submission constraints, collecting every violation rather
  /// than stopping at the first.
  pub fn validate(&self) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if self.name.trim().chars().count() < 2 {
      errors.push(FieldError {
        field:   "name".to_string(),
        message: "must be at least 2 characters".to_string(),
      });
    }
    if !is_valid_email(&self.email) {
      errors.push(FieldError {
        field:   "email".to_string(),
        message: "must be a valid email address".to_string(),
      });
    }
    if self.message.chars().count() < 10 {
      errors.push(FieldError {
        field:   "message".to_string(),
        message: "must be at least 10 characters".to_string(),
      });
    }
    if !self.privacy {
      errors.push(FieldError {
        field:   "privacy".to_string(),
        message: "privacy policy must be accepted".to_string(),
      });
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ValidationError { errors })
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// A single failed constraint on a submission field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// One or more submission constraints were violated. Always recoverable by
/// the caller correcting the fields and resubmitting.
#[derive(Debug, Clone, Error)]
#[error("validation failed on {} field(s)", errors.len())]
pub struct ValidationError {
  pub errors: Vec<FieldError>,
}

impl ValidationError {
  /// `true` if `field` is among the violated fields.
  pub fn mentions(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }
}

/// Syntactic address check: a non-empty local part, exactly one `@`, a
/// dotted domain, and no whitespace anywhere.
pub fn is_valid_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
    None => false,
  }
}
