use mediarelay_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (catalog, byte source, routes)
    let (_state, router) = mediarelay_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    mediarelay_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
