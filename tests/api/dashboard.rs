use newsletter_funnel::client::{StoreClient, StoreError};
use newsletter_funnel::dashboard::bulk_delete::BulkOutcome;
use newsletter_funnel::dashboard::sort::SortColumn;
use newsletter_funnel::dashboard::Dashboard;
use newsletter_funnel::domain::new_subscriber::{NewSubscriber, SignupForm};

use crate::helpers::TestApp;

fn new_subscriber(first_name: &str, email: &str) -> NewSubscriber {
    NewSubscriber::try_from(SignupForm {
        first_name: String::from(first_name),
        email: String::from(email),
        source: String::from("landing-page"),
    })
    .unwrap()
}

#[tokio::test]
async fn refresh_loads_the_live_collection() {
    let test_app = TestApp::spawn_app().await;
    let client = test_app.store_client();

    client.add(&new_subscriber("John", "john@test.com")).await.unwrap();
    client.add(&new_subscriber("Sarah", "sarah@test.com")).await.unwrap();

    let mut dashboard = Dashboard::new(test_app.store_client());
    let count = dashboard.refresh().await.unwrap();

    assert_eq!(count, 2);
    assert!(!dashboard.is_placeholder());
    assert_eq!(dashboard.table_rows().len(), 2);
}

#[tokio::test]
async fn a_manual_add_shows_up_immediately_and_survives_the_refresh() {
    let test_app = TestApp::spawn_app().await;
    let mut dashboard = Dashboard::new(test_app.store_client());
    dashboard.refresh().await.unwrap();

    dashboard
        .add_subscriber(new_subscriber("Frank", "frank@test.com"))
        .await
        .unwrap();

    // Optimistic prepend: visible before any further round-trip
    assert_eq!(dashboard.table_rows().len(), 1);

    dashboard.refresh().await.unwrap();
    assert_eq!(dashboard.table_rows().len(), 1);
    assert_eq!(
        dashboard.table_rows()[0].subscriber.email.as_ref(),
        "frank@test.com"
    );
}

#[tokio::test]
async fn adding_a_known_email_is_rejected_before_hitting_the_store() {
    let test_app = TestApp::spawn_app().await;
    let client = test_app.store_client();
    client.add(&new_subscriber("John", "john@test.com")).await.unwrap();

    let mut dashboard = Dashboard::new(test_app.store_client());
    dashboard.refresh().await.unwrap();

    let result = dashboard
        .add_subscriber(new_subscriber("Johnny", "John@Test.com"))
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateEmail)));
    assert_eq!(dashboard.table_rows().len(), 1);
}

#[tokio::test]
async fn search_and_sort_drive_the_table() {
    let test_app = TestApp::spawn_app().await;
    let client = test_app.store_client();
    client.add(&new_subscriber("Sarah", "sarah@test.com")).await.unwrap();
    client.add(&new_subscriber("John", "john@test.com")).await.unwrap();

    let mut dashboard = Dashboard::new(test_app.store_client());
    dashboard.refresh().await.unwrap();

    dashboard.apply_filter("sarah", newsletter_funnel::dashboard::filter::DateWindow::All);
    assert_eq!(dashboard.table_rows().len(), 1);

    dashboard.apply_filter("", newsletter_funnel::dashboard::filter::DateWindow::All);
    dashboard.sort_by(SortColumn::FirstName);
    let names: Vec<String> = dashboard
        .table_rows()
        .iter()
        .map(|row| String::from(row.subscriber.first_name.as_ref()))
        .collect();
    assert_eq!(names, vec!["John", "Sarah"]);

    dashboard.sort_by(SortColumn::FirstName);
    let names: Vec<String> = dashboard
        .table_rows()
        .iter()
        .map(|row| String::from(row.subscriber.first_name.as_ref()))
        .collect();
    assert_eq!(names, vec!["Sarah", "John"]);
}

#[tokio::test]
async fn bulk_delete_removes_every_selected_row() {
    let test_app = TestApp::spawn_app().await;
    let client = test_app.store_client();
    client.add(&new_subscriber("John", "john@test.com")).await.unwrap();
    client.add(&new_subscriber("Sarah", "sarah@test.com")).await.unwrap();
    client.add(&new_subscriber("Emma", "emma@test.com")).await.unwrap();

    let mut dashboard = Dashboard::new(test_app.store_client());
    dashboard.refresh().await.unwrap();
    dashboard.select_all();

    let requested = dashboard.request_bulk_delete().unwrap();
    assert_eq!(requested, 3);

    let report = dashboard.confirm_bulk_delete().await.unwrap();

    assert_eq!(report.outcome(), BulkOutcome::Success);
    assert_eq!(report.deleted, 3);
    assert_eq!(dashboard.selected_count(), 0);
    // The collection was re-fetched from the store, not patched locally
    assert!(dashboard.table_rows().is_empty());
}

#[tokio::test]
async fn deleting_rows_that_are_already_gone_is_a_partial_failure() {
    let test_app = TestApp::spawn_app().await;
    let client = test_app.store_client();
    client.add(&new_subscriber("John", "john@test.com")).await.unwrap();
    client.add(&new_subscriber("Sarah", "sarah@test.com")).await.unwrap();

    let mut dashboard = Dashboard::new(test_app.store_client());
    dashboard.refresh().await.unwrap();
    dashboard.select_all();
    dashboard.request_bulk_delete().unwrap();

    // Another session empties the sheet behind this dashboard's back
    for subscriber in dashboard.collection().subscribers().to_vec() {
        client
            .delete(&subscriber.email, Some(subscriber.timestamp))
            .await
            .unwrap();
    }

    let report = dashboard.confirm_bulk_delete().await.unwrap();

    assert_eq!(report.outcome(), BulkOutcome::PartialFailure);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|failure| matches!(failure.error, StoreError::NotFound)));
}

#[tokio::test]
async fn a_failed_first_load_falls_back_to_placeholder_data() {
    // Nothing is listening on this address
    let client = StoreClient::new(
        String::from("http://127.0.0.1:9/exec"),
        Some(std::time::Duration::from_millis(500)),
    );
    let mut dashboard = Dashboard::new(client);

    let result = dashboard.refresh().await;

    assert!(matches!(result, Err(StoreError::Remote(_))));
    assert!(dashboard.is_placeholder());
    assert_eq!(dashboard.table_rows().len(), 5);
    assert_eq!(dashboard.stats().total, 5);
}
