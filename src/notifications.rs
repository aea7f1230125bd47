use std::collections::HashMap;

use crate::compose;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::store::sheet::SheetRow;

const SIGNUP_SUBJECT: &str = "New Newsletter Signup";
const DELETION_SUBJECT: &str = "Subscriber Deleted";

const SIGNUP_BODY: &str = "\
<html>\
<body>\
<h1>New newsletter signup</h1>\
<p><strong>Name:</strong> {{firstName}}</p>\
<p><strong>Email:</strong> <a href=\"mailto:{{email}}\">{{email}}</a></p>\
<p><strong>Submitted:</strong> {{submittedAt}}</p>\
<p><strong>Source:</strong> {{source}}</p>\
<p><strong>IP address:</strong> {{ipAddress}}</p>\
</body>\
</html>";

const DELETION_BODY: &str = "\
<html>\
<body>\
<h1>Subscriber deleted</h1>\
<p><strong>Name:</strong> {{firstName}}</p>\
<p><strong>Email:</strong> {{email}}</p>\
<p>This subscriber has been permanently removed from the list.</p>\
</body>\
</html>";

/// Emails the configured operator addresses when the sheet changes. A failed
/// notification is logged and never fails the originating request.
pub struct Notifier {
    email_client: EmailClient,
    recipients: Vec<SubscriberEmail>,
}

impl Notifier {
    pub fn new(email_client: EmailClient, recipients: Vec<SubscriberEmail>) -> Notifier {
        Notifier {
            email_client,
            recipients,
        }
    }

    #[tracing::instrument(name = "Notifying operators of a new signup", skip(self, row))]
    pub async fn notify_signup(&self, row: &SheetRow) {
        let submitted_at = row.timestamp.to_rfc3339();
        let vars = HashMap::from([
            ("firstName", row.first_name.as_str()),
            ("email", row.email.as_str()),
            ("submittedAt", submitted_at.as_str()),
            ("source", row.source.as_str()),
            ("ipAddress", row.ip_address.as_str()),
        ]);
        let body = compose::render(SIGNUP_BODY, &vars);

        self.broadcast(SIGNUP_SUBJECT, &body).await;
    }

    #[tracing::instrument(name = "Notifying operators of a deletion", skip(self))]
    pub async fn notify_deletion(&self, first_name: &str, email: &str) {
        let vars = HashMap::from([("firstName", first_name), ("email", email)]);
        let body = compose::render(DELETION_BODY, &vars);

        self.broadcast(DELETION_SUBJECT, &body).await;
    }

    async fn broadcast(&self, subject: &str, body: &str) {
        for recipient in &self.recipients {
            if let Err(err) = self
                .email_client
                .send_email(recipient.clone(), subject, body)
                .await
            {
                tracing::error!(
                    "Failed to send a notification to {}: {:?}",
                    recipient.as_ref(),
                    err
                );
            }
        }
    }
}
