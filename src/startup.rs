use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::email_client::EmailClient;
use crate::notifications::Notifier;
use crate::routes::{handle_exec, health_check};
use crate::store::sheet::Sheet;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let sheet = Sheet::new(config.application.get_sheet_name());

        let sender_email = config
            .get_email_client_sender()
            .expect("Sender email is not valid");
        let reply_to = match config.email_client.reply_to.as_str() {
            "" => None,
            reply_to => Some(
                crate::domain::subscriber_email::SubscriberEmail::parse(String::from(reply_to))
                    .expect("Reply-to email is not valid"),
            ),
        };
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.email_client.sender_name.clone(),
            reply_to,
            config.get_email_client_api(),
            None,
        );
        let recipients = config
            .get_notification_emails()
            .expect("Notification emails are not valid");
        let notifier = Notifier::new(email_client, recipients);

        let listener =
            TcpListener::bind(config.get_address()).expect("Failed to bind the address.");
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, sheet, notifier)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, sheet: Sheet, notifier: Notifier) -> Result<Server, std::io::Error> {
    let sheet = web::Data::new(sheet);
    let notifier = web::Data::new(notifier);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/exec", web::post().to(handle_exec))
            .app_data(sheet.clone())
            .app_data(notifier.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
