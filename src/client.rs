use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use std::time;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;
use crate::protocol::{
    Envelope, WireSubscriber, ACTION_DELETE_SUBSCRIBER, ACTION_GET_SUBSCRIBERS,
};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: time::Duration = time::Duration::from_millis(200);

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("email is already subscribed")]
    DuplicateEmail,
    #[error("subscriber not found")]
    NotFound,
    #[error("remote store request failed: {0}")]
    Remote(String),
}

/// Client for the spreadsheet-backed store: one form-encoded POST endpoint,
/// multiplexed by the `action` field, answering a success/failure envelope.
pub struct StoreClient {
    http_client: Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: String, timeout: Option<time::Duration>) -> StoreClient {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()
            .unwrap();

        StoreClient {
            http_client,
            base_url,
        }
    }

    #[tracing::instrument(name = "Listing subscribers from the remote store", skip(self))]
    pub async fn list(&self) -> Result<Vec<Subscriber>, StoreError> {
        let params = [("action", ACTION_GET_SUBSCRIBERS)];
        let envelope = self.send(&params, true).await?;

        if !envelope.success {
            return Err(StoreError::Remote(
                envelope
                    .message
                    .unwrap_or_else(|| String::from("Failed to load subscribers")),
            ));
        }

        let mut subscribers = Vec::new();
        for wire in envelope.subscribers.unwrap_or_default() {
            match decode_subscriber(wire) {
                Ok(subscriber) => subscribers.push(subscriber),
                Err(err) => tracing::warn!("Skipping malformed subscriber row: {}", err),
            }
        }

        Ok(subscribers)
    }

    #[tracing::instrument(
        name = "Adding a subscriber to the remote store",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email.as_ref())
    )]
    pub async fn add(&self, new_subscriber: &NewSubscriber) -> Result<(), StoreError> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let params = [
            ("firstName", new_subscriber.first_name.as_ref()),
            ("email", new_subscriber.email.as_ref()),
            ("timestamp", timestamp.as_str()),
            ("source", new_subscriber.source.as_str()),
            ("ipAddress", "Unknown"),
        ];
        let envelope = self.send(&params, false).await?;

        if envelope.success {
            Ok(())
        } else {
            Err(classify_failure(envelope.message))
        }
    }

    #[tracing::instrument(
        name = "Deleting a subscriber from the remote store",
        skip(self, email),
        fields(subscriber_email = %email.as_ref())
    )]
    pub async fn delete(
        &self,
        email: &SubscriberEmail,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<u32, StoreError> {
        let timestamp = timestamp.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true));
        let mut params = vec![
            ("action", ACTION_DELETE_SUBSCRIBER),
            ("email", email.as_ref()),
        ];
        if let Some(ts) = timestamp.as_deref() {
            params.push(("timestamp", ts));
        }

        let envelope = self.send(&params, false).await?;

        if envelope.success {
            Ok(envelope.deleted_count.unwrap_or(1))
        } else {
            Err(classify_failure(envelope.message))
        }
    }

    async fn send(
        &self,
        params: &[(&str, &str)],
        idempotent: bool,
    ) -> Result<Envelope, StoreError> {
        let mut attempt = 1;
        let mut delay = RETRY_BASE_DELAY;

        let response = loop {
            let result = self
                .http_client
                .post(&self.base_url)
                .form(params)
                .send()
                .await;

            match result {
                Ok(response) => break response,
                Err(err) if attempt < MAX_ATTEMPTS && should_retry(&err, idempotent) => {
                    tracing::warn!("Remote store request failed (attempt {}): {}", attempt, err);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(StoreError::Remote(err.to_string())),
            }
        };

        let response = response
            .error_for_status()
            .map_err(|err| StoreError::Remote(err.to_string()))?;

        response
            .json::<Envelope>()
            .await
            .map_err(|err| StoreError::Remote(format!("malformed response envelope: {}", err)))
    }
}

// A connect failure means the request never reached the store, so replaying
// it cannot double-apply a non-idempotent operation. A timeout is ambiguous
// and only safe to replay for reads.
fn should_retry(err: &reqwest::Error, idempotent: bool) -> bool {
    err.is_connect() || (idempotent && err.is_timeout())
}

fn decode_subscriber(wire: WireSubscriber) -> Result<Subscriber, String> {
    let email = SubscriberEmail::parse(wire.email)?;
    let first_name = SubscriberName::parse_or_unknown(wire.first_name);
    let timestamp = wire.timestamp.unwrap_or_else(Utc::now);
    let source = match wire.source.is_empty() {
        true => String::from("Unknown"),
        false => wire.source,
    };

    Ok(Subscriber {
        first_name,
        email,
        timestamp,
        source,
    })
}

// The envelope has no machine-readable error kind; the store signals the
// cause through well-known message strings.
fn classify_failure(message: Option<String>) -> StoreError {
    let message = message.unwrap_or_else(|| String::from("Unknown error"));
    let lowered = message.to_lowercase();

    if lowered.contains("already subscribed") {
        StoreError::DuplicateEmail
    } else if lowered.contains("missing required") || lowered.contains("invalid email") {
        StoreError::InvalidInput(message)
    } else if lowered.contains("not found") {
        StoreError::NotFound
    } else {
        StoreError::Remote(message)
    }
}
