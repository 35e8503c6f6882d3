//! Contact form state and the email relay seam.
//!
//! The page never talks HTTP itself. A [`ContactController`] validates the
//! form, hands one [`RelayRequest`] to an [`EmailRelay`], and polls the
//! single reply it will ever get. Front-ends supply the relay (a worker
//! thread natively, `fetch` in the browser).

pub mod http;

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use folio_protocol::FormField;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RelayConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    MissingField(FormField),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("a message is already being sent")]
    AlreadySubmitting,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("relay answered HTTP {0}")]
    Status(u16),
    #[error("relay rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Subject => &mut self.subject,
            FormField::Message => &mut self.message,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// First empty field in form order, then the email's shape.
    pub fn validate(&self) -> Result<(), FormError> {
        if let Some(field) = FormField::ALL
            .into_iter()
            .find(|&f| self.get(f).trim().is_empty())
        {
            return Err(FormError::MissingField(field));
        }
        if !is_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

/// Submission lifecycle shown under the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmitStatus {
    /// Banner text for the terminal states.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("Message sent successfully! I'll get back to you soon."),
            Self::Error => Some("There was an error sending your message. Please try again."),
            Self::Idle | Self::Submitting => None,
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            Self::Submitting => "Sending...",
            _ => "Send Message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// EmailJS `send` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    #[serde(skip)]
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

impl RelayRequest {
    pub fn new(config: &RelayConfig, form: &ContactForm) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            user_id: config.public_key.clone(),
            template_params: TemplateParams {
                name: form.name.clone(),
                email: form.email.clone(),
                subject: form.subject.clone(),
                message: form.message.clone(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|e| RelayError::Transport(e.to_string()))
    }
}

/// One-shot reply channel handed to a relay with each request.
#[derive(Debug)]
pub struct RelayReply(Sender<Result<(), RelayError>>);

impl RelayReply {
    pub fn channel() -> (RelayReply, Receiver<Result<(), RelayError>>) {
        let (tx, rx) = mpsc::channel();
        (RelayReply(tx), rx)
    }

    /// Report the outcome. Consumes the reply so there is exactly one.
    pub fn send(self, outcome: Result<(), RelayError>) {
        // The controller may be gone; the outcome is then moot.
        let _ = self.0.send(outcome);
    }
}

/// Delivers a contact message to a third-party mail relay.
///
/// `dispatch` must return promptly; the outcome is reported through
/// `reply`, from any thread.
pub trait EmailRelay {
    fn dispatch(&self, request: RelayRequest, reply: RelayReply);
}

/// Form, status, and the in-flight relay request for the contact section.
///
/// Times are offsets from an arbitrary origin chosen by the front-end.
pub struct ContactController {
    form: ContactForm,
    status: SubmitStatus,
    status_since: Duration,
    reset_after: Duration,
    last_error: Option<RelayError>,
    config: RelayConfig,
    relay: Box<dyn EmailRelay>,
    pending: Option<Receiver<Result<(), RelayError>>>,
}

impl ContactController {
    pub fn new(relay: Box<dyn EmailRelay>, config: RelayConfig, reset_after: Duration) -> Self {
        Self {
            form: ContactForm::default(),
            status: SubmitStatus::Idle,
            status_since: Duration::ZERO,
            reset_after,
            last_error: None,
            config,
            relay,
            pending: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn last_error(&self) -> Option<&RelayError> {
        self.last_error.as_ref()
    }

    /// Validate and send. The form stays editable but cannot be sent again
    /// until the relay answers.
    pub fn submit(&mut self, now: Duration) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        self.form.validate()?;

        let request = RelayRequest::new(&self.config, &self.form);
        let (reply, outcome) = RelayReply::channel();
        info!(subject = %self.form.subject, "sending contact message");
        self.pending = Some(outcome);
        self.set_status(SubmitStatus::Submitting, now);
        self.relay.dispatch(request, reply);
        Ok(())
    }

    /// Collect the relay outcome and expire banners. Returns `true` when
    /// the status changed.
    pub fn poll(&mut self, now: Duration) -> bool {
        if let Some(pending) = &self.pending {
            let outcome = match pending.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(RelayError::Transport(
                    "relay dropped the request".into(),
                ))),
            };
            if let Some(outcome) = outcome {
                self.pending = None;
                match outcome {
                    Ok(()) => {
                        info!("contact message sent");
                        self.form.clear();
                        self.last_error = None;
                        self.set_status(SubmitStatus::Success, now);
                    }
                    Err(e) => {
                        warn!(error = %e, "contact message failed");
                        self.last_error = Some(e);
                        self.set_status(SubmitStatus::Error, now);
                    }
                }
                return true;
            }
        }

        let expired = now.saturating_sub(self.status_since) >= self.reset_after;
        if matches!(self.status, SubmitStatus::Success | SubmitStatus::Error) && expired {
            self.set_status(SubmitStatus::Idle, now);
            return true;
        }
        false
    }

    fn set_status(&mut self, status: SubmitStatus, now: Duration) {
        self.status = status;
        self.status_since = now;
    }
}
