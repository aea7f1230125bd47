use std::cmp::Ordering;

use crate::domain::subscriber::Subscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    FirstName,
    Email,
    Timestamp,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the active column flips its direction; clicking a new column
    /// starts over ascending.
    pub fn toggle(current: Option<SortState>, column: SortColumn) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.flipped(),
            },
            _ => SortState {
                column,
                direction: SortDirection::Ascending,
            },
        }
    }

    pub fn compare(&self, a: &Subscriber, b: &Subscriber) -> Ordering {
        let ordering = match self.column {
            SortColumn::FirstName => a
                .first_name
                .as_ref()
                .to_lowercase()
                .cmp(&b.first_name.as_ref().to_lowercase()),
            SortColumn::Email => a.email.normalized().cmp(&b.email.normalized()),
            SortColumn::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortColumn::Source => a.source.to_lowercase().cmp(&b.source.to_lowercase()),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}
