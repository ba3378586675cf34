use std::{net::TcpListener, sync::Arc};

use env_logger::Env;
use leadgen::{
    configuration::get_configuration,
    services::{enricher_from_settings, OxylabsClient},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration()?;

    let search_client = OxylabsClient::new(&configuration.search)?;
    if !search_client.is_configured() {
        log::warn!("Search provider credentials are not configured, /search will fail");
    }
    let enricher = enricher_from_settings(&configuration.enrichment)?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    log::info!("Listening on {}", address);

    run(
        listener,
        Arc::new(search_client),
        enricher,
        configuration.search,
    )?
    .await?;

    Ok(())
}
