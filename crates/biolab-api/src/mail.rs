//! Outbound notification mail.
//!
//! Two messages go out per accepted submission: an alert to the operator
//! mailbox and an acknowledgment to the submitter. Delivery is best-effort:
//! it starts only after the durable write commits, and a failure is logged
//! rather than surfaced — the submission itself already succeeded.

use std::future::Future;

use biolab_core::inquiry::Inquiry;
use lettre::{
  AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::SmtpConfig;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid mailbox address: {0}")]
  Address(#[from] lettre::address::AddressError),

  #[error("message build error: {0}")]
  Build(#[from] lettre::error::Error),

  #[error("smtp transport error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the mail collaborator, so tests can capture messages
/// instead of opening SMTP connections.
pub trait Mailer: Clone + Send + Sync + 'static {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Alert the operator mailbox about a new submission.
  fn send_operator_alert(
    &self,
    inquiry: &Inquiry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Acknowledge receipt to the submitter.
  fn send_acknowledgment(
    &self,
    inquiry: &Inquiry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Fire both notification sends on a background task.
///
/// Called after the inquiry row is committed; each failure is logged
/// independently and neither affects the already-returned response.
pub fn notify_in_background<M: Mailer>(mailer: M, inquiry: Inquiry) {
  tokio::spawn(async move {
    if let Err(e) = mailer.send_operator_alert(&inquiry).await {
      tracing::warn!(
        error = %e,
        inquiry = %inquiry.inquiry_id,
        "operator alert failed",
      );
    }
    if let Err(e) = mailer.send_acknowledgment(&inquiry).await {
      tracing::warn!(
        error = %e,
        inquiry = %inquiry.inquiry_id,
        "submitter acknowledgment failed",
      );
    }
  });
}

// ─── SMTP implementation ─────────────────────────────────────────────────────

/// Production mailer over lettre's async SMTP transport.
///
/// Built disabled when no `[smtp]` config is present; sends then succeed
/// without doing anything, so submissions proceed unnotified.
#[derive(Clone)]
pub struct SmtpMailer {
  inner: Option<SmtpInner>,
}

#[derive(Clone)]
struct SmtpInner {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
  operator:  Mailbox,
}

impl SmtpMailer {
  /// Build a mailer from the optional `[smtp]` config table.
  pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, Error> {
    let Some(cfg) = config else {
      return Ok(Self { inner: None });
    };

    let transport =
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
        .port(cfg.port)
        .credentials(Credentials::new(
          cfg.username.clone(),
          cfg.password.clone(),
        ))
        .build();

    Ok(Self {
      inner: Some(SmtpInner {
        transport,
        from: cfg.from.parse()?,
        operator: cfg.operator_email.parse()?,
      }),
    })
  }

  /// A mailer that accepts every send without delivering anything.
  pub fn disabled() -> Self { Self { inner: None } }

  pub fn is_enabled(&self) -> bool { self.inner.is_some() }
}

impl Mailer for SmtpMailer {
  type Error = Error;

  async fn send_operator_alert(&self, inquiry: &Inquiry) -> Result<(), Error> {
    let Some(inner) = &self.inner else {
      return Ok(());
    };

    let message = Message::builder()
      .from(inner.from.clone())
      .to(inner.operator.clone())
      .subject(format!("Ново запитване от {}", inquiry.name))
      .header(ContentType::TEXT_HTML)
      .body(operator_alert_body(inquiry))?;

    inner.transport.send(message).await?;
    Ok(())
  }

  async fn send_acknowledgment(&self, inquiry: &Inquiry) -> Result<(), Error> {
    let Some(inner) = &self.inner else {
      return Ok(());
    };

    let to: Mailbox = inquiry.email.parse()?;
    let message = Message::builder()
      .from(inner.from.clone())
      .to(to)
      .subject("Получихме вашето запитване - BioLabData")
      .header(ContentType::TEXT_HTML)
      .body(acknowledgment_body(inquiry))?;

    inner.transport.send(message).await?;
    Ok(())
  }
}

// ─── Templates ───────────────────────────────────────────────────────────────

fn or_unspecified(value: &Option<String>) -> &str {
  value.as_deref().unwrap_or("Не е посочено")
}

/// HTML body of the operator alert.
pub fn operator_alert_body(inquiry: &Inquiry) -> String {
  format!(
    "<h2>Ново запитване от сайта</h2>\
     <p><strong>Име:</strong> {}</p>\
     <p><strong>Email:</strong> {}</p>\
     <p><strong>Телефон:</strong> {}</p>\
     <p><strong>Университет:</strong> {}</p>\
     <p><strong>Тема:</strong> {}</p>\
     <p><strong>Тип услуга:</strong> {}</p>\
     <hr />\
     <p><strong>Съобщение:</strong></p>\
     <p>{}</p>",
    inquiry.name,
    inquiry.email,
    or_unspecified(&inquiry.phone),
    or_unspecified(&inquiry.university),
    or_unspecified(&inquiry.subject),
    or_unspecified(&inquiry.service_type),
    inquiry.message,
  )
}

/// HTML body of the submitter auto-reply.
pub fn acknowledgment_body(inquiry: &Inquiry) -> String {
  format!(
    "<h2>Благодарим ви за запитването!</h2>\
     <p>Здравейте {},</p>\
     <p>Получихме вашето запитване и ще се свържем с вас до 24 часа.</p>\
     <p>С уважение,<br />Екипът на BioLabData</p>\
     <hr />\
     <p style=\"color: #666; font-size: 12px;\">\
     Това е автоматичен отговор. Моля, не отговаряйте на този email.</p>",
    inquiry.name,
  )
}
