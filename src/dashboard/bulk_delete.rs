use futures::future::join_all;

use crate::client::{StoreClient, StoreError};
use crate::domain::subscriber::Subscriber;

/// Where the dashboard is in the delete conversation. `Confirming` holds the
/// rows captured when the user asked, so a filter change between the dialog
/// opening and the confirmation cannot swap the targets.
#[derive(Debug, Default)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming {
        targets: Vec<Subscriber>,
    },
    Deleting,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BulkDeleteError {
    #[error("no subscribers are selected")]
    EmptySelection,
    #[error("there is no pending delete to confirm")]
    NotConfirming,
    #[error("a bulk delete is already running")]
    DeleteInProgress,
}

#[derive(Debug)]
pub struct BulkDeleteFailure {
    pub email: String,
    pub error: StoreError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Success,
    PartialFailure,
    Failure,
}

/// Per-item results of one bulk delete round. Partial failures are expected:
/// each row is its own request and the batch is never all-or-nothing.
#[derive(Debug)]
pub struct BulkDeleteReport {
    pub requested: usize,
    pub deleted: usize,
    pub failures: Vec<BulkDeleteFailure>,
}

impl BulkDeleteReport {
    pub fn outcome(&self) -> BulkOutcome {
        if self.deleted == self.requested {
            return BulkOutcome::Success;
        }

        // Only transport-level trouble on every row counts as a hard failure;
        // rows the store rejected individually are a partial result.
        let all_remote = self
            .failures
            .iter()
            .all(|failure| matches!(failure.error, StoreError::Remote(_)));

        if self.deleted == 0 && all_remote {
            BulkOutcome::Failure
        } else {
            BulkOutcome::PartialFailure
        }
    }
}

/// Fires one delete per target concurrently and waits for all of them;
/// latency is bounded by the slowest request instead of the sum.
pub async fn execute_bulk_delete(
    client: &StoreClient,
    targets: &[Subscriber],
) -> BulkDeleteReport {
    let deletes = targets
        .iter()
        .map(|subscriber| client.delete(&subscriber.email, Some(subscriber.timestamp)));

    let results = join_all(deletes).await;

    let mut deleted = 0;
    let mut failures = Vec::new();

    for (subscriber, result) in targets.iter().zip(results) {
        match result {
            Ok(_) => deleted += 1,
            Err(error) => failures.push(BulkDeleteFailure {
                email: String::from(subscriber.email.as_ref()),
                error,
            }),
        }
    }

    BulkDeleteReport {
        requested: targets.len(),
        deleted,
        failures,
    }
}
