//! `rte-token-server`: serves the token broker over HTTP.

// crates.io
use color_eyre::eyre::{Result, eyre};
// self
use rte_token_broker::{config::BrokerConfig, flows::Broker, obs, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_tracing().map_err(|e| eyre!("tracing subscriber could not be installed: {e}"))?;

	let config = BrokerConfig::from_env()?;

	tracing::info!(app_id = %config.credentials.app_id, "Loaded broker configuration.");

	let broker = Broker::new(config)?;

	server::serve(broker).await?;

	Ok(())
}
