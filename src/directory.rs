//! Channel metadata lookups backed by the upstream REST API.
//!
//! Flows talk to a [`ChannelDirectory`] and forward whatever `data` payload it returns. The
//! built-in [`RestChannelDirectory`] authenticates with HTTP Basic credentials, bounds the number
//! of concurrent calls, and retries a transient failure once.

pub mod rest;

pub use rest::RestChannelDirectory;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::UpstreamError,
};

/// Boxed future returned by [`ChannelDirectory`] lookups.
pub type DirectoryFuture<'a> =
	Pin<Box<dyn Future<Output = Result<JsonValue, UpstreamError>> + 'a + Send>>;

/// Read-only view of channel occupancy for one application.
pub trait ChannelDirectory
where
	Self: Send + Sync,
{
	/// Returns the upstream `data` payload describing the users in `channel_name`.
	///
	/// The name is forwarded as-is; only token issuance enforces the channel length cap.
	fn channel_users<'a>(&'a self, app_id: &'a str, channel_name: &'a str) -> DirectoryFuture<'a>;

	/// Returns the upstream `data` payload listing the application's active channels.
	fn channels<'a>(&'a self, app_id: &'a str) -> DirectoryFuture<'a>;
}

/// Connection settings for the channel metadata API.
#[derive(Clone, Debug)]
pub struct DirectoryConfig {
	/// API root; endpoint paths are appended to it.
	pub base_url: Url,
	/// Basic-auth user name.
	pub api_key: String,
	/// Basic-auth password.
	pub api_secret: TokenSecret,
	/// Maximum number of concurrent outbound calls.
	pub max_in_flight: usize,
	/// Per-request timeout.
	pub timeout: StdDuration,
	/// Delay before the retry when the API gave no `Retry-After` hint.
	pub retry_backoff: StdDuration,
	/// Upper bound applied to `Retry-After` hints.
	pub max_retry_wait: StdDuration,
}
impl DirectoryConfig {
	/// Default API root.
	pub const DEFAULT_BASE_URL: &str = "https://api.agora.io";
	/// Default concurrency bound.
	pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Creates a configuration for the API rooted at `base_url`.
	pub fn new(base_url: Url, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
		Self {
			base_url,
			api_key: api_key.into(),
			api_secret: TokenSecret::new(api_secret),
			max_in_flight: Self::DEFAULT_MAX_IN_FLIGHT,
			timeout: Self::DEFAULT_TIMEOUT,
			retry_backoff: StdDuration::from_millis(250),
			max_retry_wait: StdDuration::from_secs(2),
		}
	}

	/// Overrides the concurrency bound.
	pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
		self.max_in_flight = max_in_flight.max(1);

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the retry delays.
	pub fn with_retry_delays(mut self, backoff: StdDuration, max_wait: StdDuration) -> Self {
		self.retry_backoff = backoff;
		self.max_retry_wait = max_wait;

		self
	}
}
