//! [`ChannelDirectory`] implementation backed by the channel metadata REST API.

// crates.io
use async_lock::Semaphore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	directory::{ChannelDirectory, DirectoryConfig, DirectoryFuture},
	error::{ConfigError, UpstreamError},
	http::{self, ReqwestHttpClient, ResponseMetadata},
};

const CHANNEL_USERS: &str = "channel_users";
const CHANNELS: &str = "channels";

/// Envelope wrapping every metadata response.
#[derive(Debug, Deserialize)]
struct Envelope {
	success: bool,
	#[serde(default)]
	data: JsonValue,
}

struct AttemptFailure {
	error: UpstreamError,
	meta: ResponseMetadata,
}
impl AttemptFailure {
	fn new(error: UpstreamError, meta: ResponseMetadata) -> Self {
		Self { error, meta }
	}
}

/// Channel directory that queries the metadata API over HTTPS.
///
/// Cloning is cheap; clones share the HTTP connection pool and the in-flight bound.
#[derive(Clone, Debug)]
pub struct RestChannelDirectory {
	config: Arc<DirectoryConfig>,
	client: ReqwestHttpClient,
	permits: Arc<Semaphore>,
}
impl RestChannelDirectory {
	/// Builds a directory with its own HTTP client.
	pub fn new(config: DirectoryConfig) -> Result<Self, ConfigError> {
		let client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Ok(Self::with_http_client(config, client))
	}

	/// Builds a directory around an existing HTTP client.
	pub fn with_http_client(config: DirectoryConfig, client: ReqwestHttpClient) -> Self {
		let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));

		Self { config: Arc::new(config), client, permits }
	}

	/// Returns the settings this directory was built with.
	pub fn config(&self) -> &DirectoryConfig {
		&self.config
	}

	fn endpoint_url(&self, segments: &[&str]) -> Url {
		let mut url = self.config.base_url.clone();

		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}

	async fn fetch_data(
		&self,
		endpoint: &'static str,
		url: Url,
	) -> Result<JsonValue, UpstreamError> {
		let failure = match self.attempt(endpoint, &url).await {
			Ok(data) => return Ok(data),
			Err(failure) => failure,
		};

		if !failure.error.is_transient() {
			return Err(failure.error);
		}

		let wait = failure
			.meta
			.retry_after
			.and_then(|hint| StdDuration::try_from(hint).ok())
			.map_or(self.config.retry_backoff, |hint| hint.min(self.config.max_retry_wait));

		tracing::warn!(
			endpoint,
			error = %failure.error,
			wait_ms = wait.as_millis() as u64,
			"Retrying channel metadata lookup."
		);
		tokio::time::sleep(wait).await;

		self.attempt(endpoint, &url).await.map_err(|failure| failure.error)
	}

	async fn attempt(
		&self,
		endpoint: &'static str,
		url: &Url,
	) -> Result<JsonValue, AttemptFailure> {
		let _permit = self.permits.acquire().await;
		let authorization =
			http::basic_authorization(&self.config.api_key, self.config.api_secret.expose());
		let response = self
			.client
			.get(url.clone())
			.header(AUTHORIZATION, authorization)
			.header(CONTENT_TYPE, "application/json")
			.send()
			.await
			.map_err(|e| {
				let error = UpstreamError::unavailable(endpoint, e);

				AttemptFailure::new(error, ResponseMetadata::default())
			})?;
		let meta = ResponseMetadata::from_response(&response);
		let status = response.status();

		if !status.is_success() {
			tracing::debug!(
				endpoint,
				status = status.as_u16(),
				"Channel metadata API returned an error status."
			);

			return Err(AttemptFailure::new(
				UpstreamError::Status { endpoint, status: status.as_u16() },
				meta,
			));
		}

		let body = response.bytes().await.map_err(|e| {
			AttemptFailure::new(UpstreamError::unavailable(endpoint, e), meta.clone())
		})?;
		let mut deserializer = serde_json::Deserializer::from_slice(&body);
		let envelope: Envelope =
			serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
				AttemptFailure::new(UpstreamError::Malformed { endpoint, source }, meta.clone())
			})?;

		if !envelope.success {
			return Err(AttemptFailure::new(UpstreamError::Rejected { endpoint }, meta));
		}

		Ok(envelope.data)
	}
}
impl ChannelDirectory for RestChannelDirectory {
	fn channel_users<'a>(&'a self, app_id: &'a str, channel_name: &'a str) -> DirectoryFuture<'a> {
		Box::pin(async move {
			let url = self.endpoint_url(&["dev", "v1", "channel", "user", app_id, channel_name]);

			self.fetch_data(CHANNEL_USERS, url).await
		})
	}

	fn channels<'a>(&'a self, app_id: &'a str) -> DirectoryFuture<'a> {
		Box::pin(async move {
			let url = self.endpoint_url(&["dev", "v1", "channel", app_id]);

			self.fetch_data(CHANNELS, url).await
		})
	}
}
