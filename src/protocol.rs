use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ACTION_ADD_SUBSCRIBER: &str = "addSubscriber";
pub const ACTION_DELETE_SUBSCRIBER: &str = "deleteSubscriber";
pub const ACTION_GET_SUBSCRIBERS: &str = "getSubscribers";

/// Response envelope shared by every store action. The store always answers
/// HTTP 200; anything other than `success: true` is a failure and `message`
/// carries the human-readable cause.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribers: Option<Vec<WireSubscriber>>,
    #[serde(rename = "deletedCount", default, skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u32>,
}

impl Envelope {
    pub fn ok(message: &str) -> Envelope {
        Envelope {
            success: true,
            message: Some(String::from(message)),
            subscribers: None,
            deleted_count: None,
        }
    }

    pub fn failure(message: &str) -> Envelope {
        Envelope {
            success: false,
            message: Some(String::from(message)),
            subscribers: None,
            deleted_count: None,
        }
    }

    pub fn with_subscribers(subscribers: Vec<WireSubscriber>) -> Envelope {
        Envelope {
            success: true,
            message: None,
            subscribers: Some(subscribers),
            deleted_count: None,
        }
    }

    pub fn deleted(count: u32, message: &str) -> Envelope {
        Envelope {
            success: true,
            message: Some(String::from(message)),
            subscribers: None,
            deleted_count: Some(count),
        }
    }
}

/// A subscriber row as it travels over the wire. Old rows can carry empty
/// cells, so everything but the email is optional on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSubscriber {
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    pub email: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: String,
}
