use chrono::{DateTime, Utc};
use std::sync::Mutex;

// Skew between the client-remembered timestamp and the stored one; signups
// are rare enough that one minute never spans two rows of the same address.
const DELETE_TOLERANCE_MS: i64 = 60_000;

/// One row of the signup sheet, column for column.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub first_name: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub ip_address: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SheetError {
    #[error("Email already subscribed")]
    DuplicateEmail,
    #[error("Subscriber not found or already deleted")]
    NotFound,
}

/// The spreadsheet the funnel writes into: an ordered, append-only list of
/// rows with no stable row ids. Deletion therefore matches on email plus an
/// optional timestamp within a tolerance window.
pub struct Sheet {
    name: String,
    rows: Mutex<Vec<SheetRow>>,
}

impl Sheet {
    pub fn new(name: String) -> Sheet {
        Sheet {
            name,
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn append(&self, row: SheetRow) -> Result<(), SheetError> {
        let mut rows = self.rows.lock().expect("sheet rows lock poisoned");

        let email_exists = rows
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&row.email));

        if email_exists {
            return Err(SheetError::DuplicateEmail);
        }

        rows.push(row);

        Ok(())
    }

    pub fn rows(&self) -> Vec<SheetRow> {
        self.rows.lock().expect("sheet rows lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("sheet rows lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes at most one row. With a timestamp the row must match it within
    /// the tolerance window; without one the first row with that email goes.
    pub fn delete(
        &self,
        email: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<u32, SheetError> {
        let mut rows = self.rows.lock().expect("sheet rows lock poisoned");

        let position = rows.iter().position(|row| {
            if !row.email.eq_ignore_ascii_case(email) {
                return false;
            }

            match timestamp {
                Some(provided) => {
                    let skew = (provided - row.timestamp).num_milliseconds().abs();
                    skew < DELETE_TOLERANCE_MS
                }
                None => true,
            }
        });

        match position {
            Some(position) => {
                rows.remove(position);
                Ok(1)
            }
            None => Err(SheetError::NotFound),
        }
    }
}
