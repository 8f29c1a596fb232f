//! Flow orchestrators behind every broker operation, independent of the HTTP surface.

pub mod common;

mod channels;
mod combined;
mod media;
mod messaging;

pub use combined::CombinedTokenResponse;
pub use common::*;
pub use media::MediaTokenResponse;
pub use messaging::MessagingTokenResponse;

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	directory::{ChannelDirectory, RestChannelDirectory},
	error::ConfigError,
	signer::{AccessTokenSigner, TokenSigner},
};

/// Coordinates token issuance and channel lookups for one application.
///
/// The broker owns the immutable configuration plus the signer and directory collaborators, so
/// individual flows only validate input and delegate. Cloning shares all three.
#[derive(Clone)]
pub struct Broker {
	/// Process configuration, including the signing credentials.
	pub config: Arc<BrokerConfig>,
	/// Signer producing opaque media and messaging tokens.
	pub signer: Arc<dyn TokenSigner>,
	/// Channel metadata source.
	pub directory: Arc<dyn ChannelDirectory>,
}
impl Broker {
	/// Creates a broker with the built-in access-token signer and REST directory.
	pub fn new(config: BrokerConfig) -> Result<Self, ConfigError> {
		let directory = RestChannelDirectory::new(config.directory.clone())?;

		Ok(Self::with_collaborators(config, Arc::new(AccessTokenSigner), Arc::new(directory)))
	}

	/// Creates a broker around caller-provided collaborators.
	pub fn with_collaborators(
		config: BrokerConfig,
		signer: Arc<dyn TokenSigner>,
		directory: Arc<dyn ChannelDirectory>,
	) -> Self {
		Self { config: Arc::new(config), signer, directory }
	}

	/// Liveness check; always answers `pong`.
	pub fn health(&self) -> HealthResponse {
		HealthResponse { message: "pong" }
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("app_id", &self.config.credentials.app_id)
			.field("listen", &self.config.listen)
			.field("max_expiry", &self.config.max_expiry)
			.finish()
	}
}

/// Liveness payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
	/// Always `pong`.
	pub message: &'static str,
}
