use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug)]
pub struct NewSubscriber {
    pub first_name: SubscriberName,
    pub email: SubscriberEmail,
    pub source: String,
}

/// Raw signup payload, straight from the landing page or the dashboard's
/// manual-entry form.
#[derive(Deserialize)]
pub struct SignupForm {
    pub first_name: String,
    pub email: String,
    pub source: String,
}

impl TryFrom<SignupForm> for NewSubscriber {
    type Error = String;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        let first_name = SubscriberName::parse(form.first_name)?;
        let email = SubscriberEmail::parse(form.email)?;

        Ok(NewSubscriber {
            first_name,
            email,
            source: form.source,
        })
    }
}
