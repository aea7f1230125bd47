use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

/// Stable identity for a row: the sheet has no row id, so (email, signup
/// instant) is the closest thing to one. Selections are keyed by this instead
/// of table positions, which go stale on every re-filter or re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberKey {
    email: String,
    timestamp: DateTime<Utc>,
}

impl SubscriberKey {
    pub fn new(email: &SubscriberEmail, timestamp: DateTime<Utc>) -> SubscriberKey {
        SubscriberKey {
            email: email.normalized(),
            timestamp,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
