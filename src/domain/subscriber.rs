use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_key::SubscriberKey;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Subscriber {
    pub first_name: SubscriberName,
    pub email: SubscriberEmail,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl Subscriber {
    pub fn key(&self) -> SubscriberKey {
        SubscriberKey::new(&self.email, self.timestamp)
    }
}
