use docshift_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (directories, services, routes)
    let (state, router) = docshift_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    docshift_api::setup::server::start_server(&config, router, state.readiness.clone()).await?;

    docshift_infra::shutdown_telemetry().await;

    Ok(())
}
