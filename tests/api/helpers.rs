use reqwest::Response;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsletter_funnel::{
    client::StoreClient,
    config::{get_configuration, Settings},
    startup::Application,
};

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub email_server: MockServer,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let email_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());

        // Operator notifications always succeed unless a test mounts something stricter
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .mount(&email_server)
            .await;

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());
        config.set_store_base_url(format!("{}/exec", address));

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            email_server,
        }
    }

    pub fn store_client(&self) -> StoreClient {
        StoreClient::new(
            self.config.get_store_base_url(),
            Some(std::time::Duration::from_secs(5)),
        )
    }

    pub async fn post_exec(&self, form: &[(&str, &str)]) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/exec", self.address);

        client
            .post(&url)
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
