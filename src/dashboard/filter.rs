use chrono::{DateTime, Duration, Months, NaiveTime, TimeZone, Utc};

use crate::domain::subscriber::Subscriber;

/// Signup-date windows offered by the dashboard. Each window is anchored at
/// midnight so "today" means the calendar day, not the last 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateWindow {
    pub fn parse(value: &str) -> Result<DateWindow, String> {
        match value {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            unknown => Err(format!("{} is not a valid date window", unknown)),
        }
    }

    /// Inclusive lower bound of the window; `None` means unbounded.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));

        match self {
            DateWindow::All => None,
            DateWindow::Today => Some(midnight),
            DateWindow::Week => Some(midnight - Duration::days(7)),
            DateWindow::Month => midnight.checked_sub_months(Months::new(1)),
        }
    }
}

/// The dashboard's current filter controls: free-text search plus a date
/// window. Always evaluated against the raw collection so filters never
/// stack on a previously filtered view.
#[derive(Debug, Clone, Default)]
pub struct FilterQuery {
    pub search: String,
    pub window: DateWindow,
}

impl FilterQuery {
    pub fn new(search: impl Into<String>, window: DateWindow) -> FilterQuery {
        FilterQuery {
            search: search.into(),
            window,
        }
    }

    pub fn matches(&self, subscriber: &Subscriber, now: DateTime<Utc>) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || subscriber
                .first_name
                .as_ref()
                .to_lowercase()
                .contains(&term)
            || subscriber.email.normalized().contains(&term);

        let matches_window = match self.window.start(now) {
            None => true,
            Some(start) => subscriber.timestamp >= start,
        };

        matches_search && matches_window
    }
}
