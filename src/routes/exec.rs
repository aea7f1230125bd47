use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::notifications::Notifier;
use crate::protocol::{
    Envelope, WireSubscriber, ACTION_ADD_SUBSCRIBER, ACTION_DELETE_SUBSCRIBER,
    ACTION_GET_SUBSCRIBERS,
};
use crate::store::sheet::{Sheet, SheetError, SheetRow};

/// Form fields accepted by the exec endpoint. Everything is optional at this
/// level; each action validates the fields it needs.
#[derive(Deserialize)]
pub struct ExecForm {
    pub action: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub timestamp: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "ipAddress")]
    pub ip_address: Option<String>,
}

// The original scripting host always answered 200 and signalled failure
// through the envelope; clients depend on that, so every arm does the same.
#[tracing::instrument(
    name = "Handling a store action",
    skip(form, sheet, notifier),
    fields(action = form.action.as_deref().unwrap_or(ACTION_ADD_SUBSCRIBER))
)]
pub async fn handle_exec(
    form: web::Form<ExecForm>,
    sheet: web::Data<Sheet>,
    notifier: web::Data<Notifier>,
) -> impl Responder {
    let form = form.into_inner();
    let action = form.action.as_deref().unwrap_or(ACTION_ADD_SUBSCRIBER);

    match action {
        ACTION_GET_SUBSCRIBERS => get_subscribers(&sheet),
        ACTION_DELETE_SUBSCRIBER => delete_subscriber(form, &sheet, &notifier).await,
        _ => add_subscriber(form, &sheet, &notifier).await,
    }
}

async fn add_subscriber(
    form: ExecForm,
    sheet: &Sheet,
    notifier: &Notifier,
) -> HttpResponse {
    let (first_name, email) = match (form.first_name, form.email) {
        (Some(first_name), Some(email)) if !first_name.is_empty() && !email.is_empty() => {
            (first_name, email)
        }
        _ => return HttpResponse::Ok().json(Envelope::failure("Missing required fields")),
    };

    let email = match SubscriberEmail::parse(email) {
        Ok(email) => email,
        Err(err) => {
            tracing::warn!("Rejected signup: {}", err);
            return HttpResponse::Ok().json(Envelope::failure("Invalid email format"));
        }
    };

    // The sheet stamps its own clock; the client-sent timestamp is absorbed
    // by the delete tolerance window.
    let row = SheetRow {
        first_name,
        email: String::from(email.as_ref()),
        timestamp: Utc::now(),
        source: form.source.unwrap_or_default(),
        ip_address: form.ip_address.unwrap_or_else(|| String::from("Unknown")),
    };

    match sheet.append(row.clone()) {
        Ok(()) => {
            tracing::info!("Added subscriber {}", row.email);
            notifier.notify_signup(&row).await;

            HttpResponse::Ok().json(Envelope::ok("Successfully submitted!"))
        }
        Err(SheetError::DuplicateEmail) => {
            HttpResponse::Ok().json(Envelope::failure("Email already subscribed"))
        }
        Err(err) => HttpResponse::Ok().json(Envelope::failure(&err.to_string())),
    }
}

async fn delete_subscriber(
    form: ExecForm,
    sheet: &Sheet,
    notifier: &Notifier,
) -> HttpResponse {
    let email = match form.email {
        Some(email) if !email.is_empty() => email,
        _ => return HttpResponse::Ok().json(Envelope::failure("Email is required for deletion")),
    };

    let timestamp = match form.timestamp.as_deref() {
        None | Some("") => None,
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                return HttpResponse::Ok().json(Envelope::failure("Invalid timestamp format"))
            }
        },
    };

    let first_name = sheet
        .rows()
        .iter()
        .find(|row| row.email.eq_ignore_ascii_case(&email))
        .map(|row| row.first_name.clone())
        .unwrap_or_else(|| String::from("Unknown"));

    match sheet.delete(&email, timestamp) {
        Ok(deleted_count) => {
            tracing::info!("Deleted subscriber {}", email);
            notifier.notify_deletion(&first_name, &email).await;

            HttpResponse::Ok().json(Envelope::deleted(
                deleted_count,
                "Subscriber deleted successfully",
            ))
        }
        Err(SheetError::NotFound) => {
            HttpResponse::Ok().json(Envelope::failure("Subscriber not found or already deleted"))
        }
        Err(err) => HttpResponse::Ok().json(Envelope::failure(&err.to_string())),
    }
}

fn get_subscribers(sheet: &Sheet) -> HttpResponse {
    let subscribers = sheet
        .rows()
        .into_iter()
        .map(|row| WireSubscriber {
            first_name: row.first_name,
            email: row.email,
            timestamp: Some(row.timestamp),
            source: row.source,
        })
        .collect();

    HttpResponse::Ok().json(Envelope::with_subscribers(subscribers))
}
