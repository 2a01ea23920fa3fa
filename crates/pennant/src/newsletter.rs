//! Newsletter sign-ups.
//!
//! A submission is a single best-effort request: it either succeeds or fails,
//! and a failure is only ever shown to the reader, never retried.

use std::env;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::NewsletterConfig;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^\S+@\S+$").expect("failed to compile regex for emails"))
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum EmailError {
    #[error("This field is required.")]
    Required,

    #[error("Please enter a valid email address.")]
    Invalid,
}

/// An email address that passed validation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EmailError::Required);
        }

        if !email_regex().is_match(input) {
            return Err(EmailError::Invalid);
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Error, Debug)]
pub enum SubscribeError {
    #[error("newsletter is missing its {0}")]
    MissingSetting(&'static str),

    #[error("subscription request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Something that can sign an email address up for the newsletter.
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn subscribe(&self, email: &EmailAddress) -> Result<(), SubscribeError>;
}

/// Returns the URL a ConvertKit form accepts sign-ups at.
pub fn subscribe_url(endpoint: &str, form_id: &str) -> String {
    format!("{}/{form_id}/subscribe", endpoint.trim_end_matches('/'))
}

/// Returns where a static sign-up form should post to, if a form is configured.
pub fn form_action(config: &NewsletterConfig) -> Option<String> {
    form_id(config).map(|form_id| subscribe_url(&config.endpoint, &form_id))
}

fn form_id(config: &NewsletterConfig) -> Option<String> {
    config
        .form_id
        .clone()
        .or_else(|| env::var(ConvertKit::FORM_ID_VAR).ok())
}

/// A [`Subscriber`] backed by a ConvertKit sign-up form.
pub struct ConvertKit {
    client: reqwest::Client,
    subscribe_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
    api_key: &'a str,
}

impl ConvertKit {
    /// The environment variable consulted when the config has no form id.
    pub const FORM_ID_VAR: &'static str = "CONVERTKIT_SIGNUP_FORM";

    /// The environment variable consulted when the config has no API key.
    pub const API_KEY_VAR: &'static str = "CONVERTKIT_PUBLIC_KEY";

    pub fn new(
        endpoint: &str,
        form_id: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, SubscribeError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            subscribe_url: subscribe_url(endpoint, form_id),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &NewsletterConfig) -> Result<Self, SubscribeError> {
        let form_id = form_id(config).ok_or(SubscribeError::MissingSetting("form id"))?;
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env::var(Self::API_KEY_VAR).ok())
            .ok_or(SubscribeError::MissingSetting("API key"))?;

        Self::new(&config.endpoint, &form_id, api_key)
    }

    pub fn subscribe_url(&self) -> &str {
        &self.subscribe_url
    }
}

#[async_trait]
impl Subscriber for ConvertKit {
    async fn subscribe(&self, email: &EmailAddress) -> Result<(), SubscribeError> {
        self.client
            .post(&self.subscribe_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
            .json(&SubscribeRequest {
                email: email.as_str(),
                api_key: &self.api_key,
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Where a sign-up form is in its lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum SubscriptionStatus {
    #[default]
    Idle,
    Success,
    Failed,
}

/// The state behind a newsletter sign-up form.
#[derive(Debug, Default)]
pub struct NewsletterForm {
    status: SubscriptionStatus,
    error: Option<EmailError>,
}

impl NewsletterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn error(&self) -> Option<EmailError> {
        self.error
    }

    /// Submits the address the reader entered.
    ///
    /// Invalid input keeps the form idle and records the problem. Otherwise
    /// the form ends up in either [`SubscriptionStatus::Success`] or
    /// [`SubscriptionStatus::Failed`].
    pub async fn submit(&mut self, subscriber: &dyn Subscriber, input: &str) -> SubscriptionStatus {
        let email = match EmailAddress::parse(input) {
            Ok(email) => email,
            Err(err) => {
                self.error = Some(err);
                return self.status;
            }
        };

        self.error = None;
        self.status = match subscriber.subscribe(&email).await {
            Ok(()) => SubscriptionStatus::Success,
            Err(err) => {
                tracing::warn!(error = %err, "Newsletter subscription failed");
                SubscriptionStatus::Failed
            }
        };

        self.status
    }
}
