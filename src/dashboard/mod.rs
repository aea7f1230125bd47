pub mod bulk_delete;
pub mod collection;
pub mod export;
pub mod filter;
pub mod selection;
pub mod sort;
pub mod view;

use chrono::Utc;

use crate::client::{StoreClient, StoreError};
use crate::config::ExportFormat;
use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;

use bulk_delete::{execute_bulk_delete, BulkDeleteError, BulkDeleteReport, DeleteFlow};
use collection::{DashboardStats, SubscriberCollection};
use filter::{DateWindow, FilterQuery};
use selection::Selection;
use sort::{SortColumn, SortState};
use view::{FilteredView, TableRow};

/// Everything behind the subscribers table: the raw collection, the current
/// filter/sort, the selection and the delete conversation. All mutation goes
/// through here; after every change the visible view is rebuilt from scratch.
pub struct Dashboard {
    client: StoreClient,
    collection: SubscriberCollection,
    query: FilterQuery,
    sort: Option<SortState>,
    selection: Selection,
    flow: DeleteFlow,
    view: FilteredView,
    placeholder: bool,
}

impl Dashboard {
    pub fn new(client: StoreClient) -> Dashboard {
        Dashboard {
            client,
            collection: SubscriberCollection::new(),
            query: FilterQuery::default(),
            sort: None,
            selection: Selection::default(),
            flow: DeleteFlow::Idle,
            view: FilteredView::default(),
            placeholder: false,
        }
    }

    /// Replaces the collection with the store's current truth. If the very
    /// first load fails the table falls back to a placeholder roster; the
    /// error is still returned so the caller can say so.
    #[tracing::instrument(name = "Refreshing the subscriber collection", skip(self))]
    pub async fn refresh(&mut self) -> Result<usize, StoreError> {
        match self.client.list().await {
            Ok(subscribers) => {
                let count = subscribers.len();
                self.collection.set_all(subscribers);
                self.placeholder = false;
                self.recompute_view();

                Ok(count)
            }
            Err(err) => {
                if self.collection.is_empty() {
                    tracing::warn!("Initial load failed, showing placeholder data: {}", err);
                    self.collection.set_all(SubscriberCollection::sample(Utc::now()));
                    self.placeholder = true;
                    self.recompute_view();
                }

                Err(err)
            }
        }
    }

    /// Whether the table currently shows the placeholder roster instead of
    /// live store data.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Validates locally, submits to the store, then prepends optimistically
    /// so the new signup shows immediately. The next refresh reconciles.
    #[tracing::instrument(
        name = "Adding a subscriber from the dashboard",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email.as_ref())
    )]
    pub async fn add_subscriber(&mut self, new_subscriber: NewSubscriber) -> Result<(), StoreError> {
        if self.collection.contains_email(new_subscriber.email.as_ref()) {
            return Err(StoreError::DuplicateEmail);
        }

        self.client.add(&new_subscriber).await?;

        self.collection.prepend(Subscriber {
            first_name: new_subscriber.first_name,
            email: new_subscriber.email,
            timestamp: Utc::now(),
            source: new_subscriber.source,
        });
        self.recompute_view();

        Ok(())
    }

    pub fn apply_filter(&mut self, search: impl Into<String>, window: DateWindow) {
        self.query = FilterQuery::new(search, window);
        self.recompute_view();
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = Some(SortState::toggle(self.sort, column));
        self.recompute_view();
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn table_rows(&self) -> Vec<TableRow<'_>> {
        self.view.table_rows(&self.selection)
    }

    pub fn stats(&self) -> DashboardStats {
        self.collection.stats(Utc::now())
    }

    pub fn collection(&self) -> &SubscriberCollection {
        &self.collection
    }

    /// Toggles the row at the given view position; returns whether it is
    /// selected afterwards. Out-of-range positions are ignored.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        match self.view.get(index) {
            Some(subscriber) => {
                let key = subscriber.key();
                self.selection.toggle(key)
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.view);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn export(&self, format: ExportFormat) -> String {
        export::export(&self.view, format)
    }

    /// Opens the confirmation step and captures the selected rows as they
    /// stand in the current view. Returns how many rows would be removed.
    pub fn request_bulk_delete(&mut self) -> Result<usize, BulkDeleteError> {
        if matches!(self.flow, DeleteFlow::Deleting) {
            return Err(BulkDeleteError::DeleteInProgress);
        }

        let targets: Vec<Subscriber> = self
            .view
            .rows()
            .iter()
            .filter(|subscriber| self.selection.contains(&subscriber.key()))
            .cloned()
            .collect();

        if targets.is_empty() {
            return Err(BulkDeleteError::EmptySelection);
        }

        let count = targets.len();
        self.flow = DeleteFlow::Confirming { targets };

        Ok(count)
    }

    pub fn cancel_bulk_delete(&mut self) {
        if !matches!(self.flow, DeleteFlow::Deleting) {
            self.flow = DeleteFlow::Idle;
        }
    }

    /// Runs the confirmed bulk delete: all requests in flight at once, then
    /// the selection is cleared and the collection re-fetched no matter how
    /// many rows actually went away. The store is the source of truth.
    #[tracing::instrument(name = "Running a confirmed bulk delete", skip(self))]
    pub async fn confirm_bulk_delete(&mut self) -> Result<BulkDeleteReport, BulkDeleteError> {
        let targets = match &self.flow {
            DeleteFlow::Confirming { targets } => targets.clone(),
            DeleteFlow::Deleting => return Err(BulkDeleteError::DeleteInProgress),
            DeleteFlow::Idle => return Err(BulkDeleteError::NotConfirming),
        };

        self.flow = DeleteFlow::Deleting;

        let report = execute_bulk_delete(&self.client, &targets).await;

        self.selection.clear();
        if let Err(err) = self.refresh().await {
            tracing::warn!("Failed to refresh subscribers after bulk delete: {}", err);
        }
        self.flow = DeleteFlow::Idle;

        Ok(report)
    }

    fn recompute_view(&mut self) {
        self.view = self.collection.filter(&self.query, Utc::now());

        if let Some(sort) = &self.sort {
            self.view.sort_by(sort);
        }
    }
}
