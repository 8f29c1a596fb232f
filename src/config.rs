//! Immutable process configuration loaded once at startup.
//!
//! [`BrokerConfig::from_env`] reads a `.env` file when present, then the process environment.
//! Tests and embedders can call [`BrokerConfig::from_lookup`] with any key/value source instead.

// std
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
// self
use crate::{
	_prelude::*,
	auth::Expiry,
	directory::DirectoryConfig,
	error::{ConfigError, SigningError},
	signer::AppCredentials,
};

/// Application identity (32 hex chars).
pub const ENV_APP_ID: &str = "APP_ID";
/// Application certificate used to sign tokens (32 hex chars).
pub const ENV_APP_CERTIFICATE: &str = "APP_CERTIFICATE";
/// Channel metadata API key.
pub const ENV_API_KEY: &str = "AGORA_API_KEY";
/// Channel metadata API secret.
pub const ENV_API_SECRET: &str = "AGORA_API_SECRET";
/// Listen port.
pub const ENV_PORT: &str = "PORT";
/// Listen address.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
/// Channel metadata API base URL.
pub const ENV_METADATA_BASE_URL: &str = "METADATA_BASE_URL";
/// Maximum concurrent outbound metadata calls.
pub const ENV_METADATA_MAX_IN_FLIGHT: &str = "METADATA_MAX_IN_FLIGHT";
/// Outbound metadata call timeout in milliseconds.
pub const ENV_METADATA_TIMEOUT_MS: &str = "METADATA_TIMEOUT_MS";
/// Largest `expiry` accepted from callers, in seconds.
pub const ENV_TOKEN_MAX_EXPIRY_SECS: &str = "TOKEN_MAX_EXPIRY_SECS";

const DEFAULT_PORT: u16 = 8080;

/// Broker configuration shared (read-only) by every request.
#[derive(Clone, Debug)]
pub struct BrokerConfig {
	/// Socket address the HTTP server binds to.
	pub listen: SocketAddr,
	/// Identity/certificate pair handed to the token signer.
	pub credentials: AppCredentials,
	/// Channel metadata API settings.
	pub directory: DirectoryConfig,
	/// Largest relative lifetime callers may request.
	pub max_expiry: Expiry,
}
impl BrokerConfig {
	/// Creates a configuration with default listen address and token policy.
	pub fn new(credentials: AppCredentials, directory: DirectoryConfig) -> Self {
		Self {
			listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
			credentials,
			directory,
			max_expiry: Expiry::DEFAULT_MAX,
		}
	}

	/// Overrides the listen address.
	pub fn with_listen(mut self, listen: SocketAddr) -> Self {
		self.listen = listen;

		self
	}

	/// Overrides the largest accepted expiry.
	pub fn with_max_expiry(mut self, max_expiry: Expiry) -> Self {
		self.max_expiry = max_expiry;

		self
	}

	/// Loads `.env` (if present) and then reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		if let Err(e) = dotenvy::dotenv() {
			if !e.not_found() {
				return Err(ConfigError::invalid(".env", e));
			}
		}

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key/value source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |var: &'static str| {
			lookup(var).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
		};
		let require = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });
		let credentials = AppCredentials::new(require(ENV_APP_ID)?, require(ENV_APP_CERTIFICATE)?);

		credentials.validate().map_err(|e| {
			let var = match e {
				SigningError::InvalidCredential { credential: "identity" } => ENV_APP_ID,
				_ => ENV_APP_CERTIFICATE,
			};

			ConfigError::invalid(var, "expected a 32-character hex string")
		})?;

		let base_url = get(ENV_METADATA_BASE_URL)
			.unwrap_or_else(|| DirectoryConfig::DEFAULT_BASE_URL.to_owned());
		let base_url =
			Url::parse(&base_url).map_err(|e| ConfigError::invalid(ENV_METADATA_BASE_URL, e))?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::invalid(ENV_METADATA_BASE_URL, "must be an absolute URL"));
		}

		let mut directory =
			DirectoryConfig::new(base_url, require(ENV_API_KEY)?, require(ENV_API_SECRET)?);

		if let Some(raw) = get(ENV_METADATA_MAX_IN_FLIGHT) {
			let permits = parse::<usize>(ENV_METADATA_MAX_IN_FLIGHT, &raw)?;

			if permits == 0 {
				return Err(ConfigError::invalid(ENV_METADATA_MAX_IN_FLIGHT, "must be at least 1"));
			}

			directory = directory.with_max_in_flight(permits);
		}
		if let Some(raw) = get(ENV_METADATA_TIMEOUT_MS) {
			let millis = parse::<u64>(ENV_METADATA_TIMEOUT_MS, &raw)?;

			directory = directory.with_timeout(StdDuration::from_millis(millis));
		}

		let ip = match get(ENV_BIND_ADDR) {
			Some(raw) => parse::<IpAddr>(ENV_BIND_ADDR, &raw)?,
			None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
		};
		let port = match get(ENV_PORT) {
			Some(raw) => parse::<u16>(ENV_PORT, &raw)?,
			None => DEFAULT_PORT,
		};
		let mut config = Self::new(credentials, directory).with_listen(SocketAddr::new(ip, port));

		if let Some(raw) = get(ENV_TOKEN_MAX_EXPIRY_SECS) {
			let secs = parse::<u32>(ENV_TOKEN_MAX_EXPIRY_SECS, &raw)?;
			let max = Expiry::from_secs(secs)
				.map_err(|_| ConfigError::invalid(ENV_TOKEN_MAX_EXPIRY_SECS, "must be positive"))?;

			config = config.with_max_expiry(max);
		}

		Ok(config)
	}
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.parse().map_err(|e| ConfigError::invalid(var, e))
}
