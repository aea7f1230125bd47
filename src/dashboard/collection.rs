use chrono::{DateTime, Duration, Utc};

use crate::dashboard::filter::FilterQuery;
use crate::dashboard::view::FilteredView;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub today: usize,
}

/// The raw, unfiltered subscriber list as last seen from the store. Replaced
/// wholesale on refresh; a manual add is prepended so the newest signup shows
/// first until the next refresh takes over as ground truth.
#[derive(Debug, Default)]
pub struct SubscriberCollection {
    subscribers: Vec<Subscriber>,
}

impl SubscriberCollection {
    pub fn new() -> SubscriberCollection {
        SubscriberCollection::default()
    }

    pub fn set_all(&mut self, subscribers: Vec<Subscriber>) {
        self.subscribers = subscribers;
    }

    pub fn prepend(&mut self, subscriber: Subscriber) {
        self.subscribers.insert(0, subscriber);
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.subscribers
            .iter()
            .any(|subscriber| subscriber.email.matches(email))
    }

    pub fn filter(&self, query: &FilterQuery, now: DateTime<Utc>) -> FilteredView {
        let rows = self
            .subscribers
            .iter()
            .filter(|subscriber| query.matches(subscriber, now))
            .cloned()
            .collect();

        FilteredView::new(rows)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        let today = FilterQuery::new("", crate::dashboard::filter::DateWindow::Today);
        let today_count = self
            .subscribers
            .iter()
            .filter(|subscriber| today.matches(subscriber, now))
            .count();

        DashboardStats {
            total: self.subscribers.len(),
            today: today_count,
        }
    }

    /// Placeholder roster shown when the very first load fails, so the table
    /// demonstrates itself instead of sitting empty.
    pub fn sample(now: DateTime<Utc>) -> Vec<Subscriber> {
        let entries = [
            ("John", "john.doe@example.com", Duration::minutes(30)),
            ("Sarah", "sarah.smith@example.com", Duration::hours(4)),
            ("Michael", "michael.jones@example.com", Duration::days(1)),
            ("Emma", "emma.wilson@example.com", Duration::days(2)),
            ("David", "david.brown@example.com", Duration::days(6)),
        ];

        entries
            .into_iter()
            .map(|(name, email, age)| Subscriber {
                first_name: SubscriberName::parse_or_unknown(String::from(name)),
                email: SubscriberEmail::parse(String::from(email))
                    .expect("sample email is valid"),
                timestamp: now - age,
                source: String::from("sample-data"),
            })
            .collect()
    }
}
