use newsletter_funnel::config::get_configuration;
use newsletter_funnel::startup::Application;
use newsletter_funnel::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(String::from("newsletter_funnel"), String::from("debug"));

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");

    tracing::info!("Sheet store listening on {}", config.get_address());

    let application = Application::build(config).await?;

    application.run_until_stop().await
}
