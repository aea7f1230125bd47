use chrono::{Duration, SecondsFormat, Utc};
use newsletter_funnel::protocol::Envelope;

use crate::helpers::TestApp;

#[tokio::test]
async fn add_subscriber_returns_a_success_envelope() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_exec(&[
            ("action", "addSubscriber"),
            ("firstName", "Frank"),
            ("email", "frank@test.com"),
            ("timestamp", &Utc::now().to_rfc3339()),
            ("source", "landing-page"),
            ("ipAddress", "Unknown"),
        ])
        .await;

    assert_eq!(200, response.status().as_u16());

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Successfully submitted!"));
}

#[tokio::test]
async fn the_default_action_is_add_subscriber() {
    let test_app = TestApp::spawn_app().await;

    // The landing page form posts without an action field
    let response = test_app
        .post_exec(&[("firstName", "Frank"), ("email", "frank@test.com")])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(envelope.success);
}

#[tokio::test]
async fn add_subscriber_with_missing_fields_is_rejected() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where the store should report a validation failure.
    let test_cases: Vec<(Vec<(&str, &str)>, &str)> = vec![
        (vec![("firstName", "Frank")], "missing email field"),
        (vec![("email", "frank@test.com")], "missing firstName field"),
        (
            vec![("firstName", ""), ("email", "frank@test.com")],
            "empty firstName field",
        ),
    ];

    for (invalid_form, error_message) in test_cases {
        let response = test_app.post_exec(&invalid_form).await;
        let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");

        assert!(
            !envelope.success,
            "The store did not reject the form when payload had {}",
            error_message
        );
        assert_eq!(envelope.message.as_deref(), Some("Missing required fields"));
    }
}

#[tokio::test]
async fn add_subscriber_with_an_invalid_email_is_rejected() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_exec(&[("firstName", "Frank"), ("email", "not an email")])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Invalid email format"));
}

#[tokio::test]
async fn a_duplicate_email_is_rejected_case_insensitively() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "Frank"), ("email", "frank@test.com")])
        .await;
    let response = test_app
        .post_exec(&[("firstName", "Frankie"), ("email", "Frank@Test.com")])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Email already subscribed"));
}

#[tokio::test]
async fn get_subscribers_returns_rows_in_insertion_order() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "John"), ("email", "john@test.com")])
        .await;
    test_app
        .post_exec(&[("firstName", "Sarah"), ("email", "sarah@test.com")])
        .await;

    let response = test_app.post_exec(&[("action", "getSubscribers")]).await;
    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");

    assert!(envelope.success);
    let subscribers = envelope.subscribers.expect("Envelope had no subscribers.");
    assert_eq!(subscribers.len(), 2);
    assert_eq!(subscribers[0].email, "john@test.com");
    assert_eq!(subscribers[1].email, "sarah@test.com");
}

#[tokio::test]
async fn delete_without_timestamp_removes_the_first_match() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "John"), ("email", "john@test.com")])
        .await;

    let response = test_app
        .post_exec(&[("action", "deleteSubscriber"), ("email", "john@test.com")])
        .await;
    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");

    assert!(envelope.success);
    assert_eq!(envelope.deleted_count, Some(1));

    let response = test_app.post_exec(&[("action", "getSubscribers")]).await;
    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert_eq!(envelope.subscribers.expect("no subscribers").len(), 0);
}

#[tokio::test]
async fn delete_tolerates_a_skewed_timestamp() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "John"), ("email", "john@test.com")])
        .await;

    // The dashboard remembers its own clock, not the sheet's
    let skewed = (Utc::now() + Duration::seconds(30)).to_rfc3339_opts(SecondsFormat::Millis, true);
    let response = test_app
        .post_exec(&[
            ("action", "deleteSubscriber"),
            ("email", "john@test.com"),
            ("timestamp", &skewed),
        ])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(envelope.success);
}

#[tokio::test]
async fn delete_with_a_timestamp_outside_the_tolerance_reports_not_found() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "John"), ("email", "john@test.com")])
        .await;

    let stale = (Utc::now() + Duration::minutes(10)).to_rfc3339_opts(SecondsFormat::Millis, true);
    let response = test_app
        .post_exec(&[
            ("action", "deleteSubscriber"),
            ("email", "john@test.com"),
            ("timestamp", &stale),
        ])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(!envelope.success);
    assert_eq!(
        envelope.message.as_deref(),
        Some("Subscriber not found or already deleted")
    );
}

#[tokio::test]
async fn delete_of_an_unknown_email_reports_not_found() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_exec(&[("action", "deleteSubscriber"), ("email", "missing@test.com")])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(!envelope.success);
}

#[tokio::test]
async fn a_new_signup_sends_a_notification_email() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_exec(&[("firstName", "Frank"), ("email", "frank@test.com")])
        .await;

    let received_requests = test_app.email_server.received_requests().await.unwrap();
    assert!(!received_requests.is_empty());
}

#[tokio::test]
async fn a_failing_notification_does_not_fail_the_signup() {
    let test_app = TestApp::spawn_app().await;

    // Replace the default catch-all with a mail server that always errors
    test_app.email_server.reset().await;
    wiremock::Mock::given(wiremock::matchers::any())
        .respond_with(wiremock::ResponseTemplate::new(500))
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_exec(&[("firstName", "Frank"), ("email", "frank@test.com")])
        .await;

    let envelope: Envelope = response.json().await.expect("Envelope was not valid JSON.");
    assert!(envelope.success);
}
