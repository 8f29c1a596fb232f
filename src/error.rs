//! Broker-level error types shared across flows, signers, directories, and configuration.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller supplied a missing or unrecognized parameter.
	#[error(transparent)]
	InvalidRequest(#[from] RequestError),
	/// Channel metadata API failed or returned an unusable response.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Token signer could not produce a token.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Validation failures raised before any signing or upstream call.
///
/// The [`Display`] output is the one-line message returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RequestError {
	/// A required parameter was absent or empty.
	#[error("{field} is required")]
	Missing {
		/// Parameter name.
		field: &'static str,
	},
	/// A parameter exceeded its length limit.
	#[error("{field} is too long")]
	TooLong {
		/// Parameter name.
		field: &'static str,
		/// Maximum permitted length in bytes.
		max: usize,
	},
	/// The role is outside the recognized set.
	#[error("role is incorrect")]
	UnknownRole {
		/// Rejected value.
		value: String,
	},
	/// The token type is outside the recognized set.
	#[error("token type is invalid")]
	UnknownTokenKind {
		/// Rejected value.
		value: String,
	},
	/// The expiry is not a positive integer.
	#[error("expiry must be a positive integer")]
	InvalidExpiry {
		/// Rejected value.
		value: String,
	},
	/// The query string could not be decoded, for example a repeated `expiry`.
	#[error("query string is invalid")]
	InvalidQuery {
		/// Decoder message.
		reason: String,
	},
	/// A path segment could not be decoded.
	#[error("path is invalid")]
	InvalidPath {
		/// Decoder message.
		reason: String,
	},
	/// The expiry exceeds the configured maximum.
	#[error("expiry exceeds the maximum of {max} seconds")]
	ExpiryTooLarge {
		/// Requested lifetime in seconds.
		requested: u64,
		/// Maximum permitted lifetime in seconds.
		max: u32,
	},
}

/// Failures talking to the channel metadata API.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// The envelope reported `success: false`.
	#[error("Channel metadata API rejected the {endpoint} lookup.")]
	Rejected {
		/// Logical endpoint label.
		endpoint: &'static str,
	},
	/// The API answered with a non-success HTTP status.
	#[error("Channel metadata API returned HTTP {status} for the {endpoint} lookup.")]
	Status {
		/// Logical endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
	},
	/// The body was not a valid `{ success, data }` envelope.
	#[error("Channel metadata API returned a malformed {endpoint} response.")]
	Malformed {
		/// Logical endpoint label.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The API could not be reached (DNS, TCP, TLS, timeout).
	#[error("Channel metadata API is unavailable for the {endpoint} lookup.")]
	Unavailable {
		/// Logical endpoint label.
		endpoint: &'static str,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
}
impl UpstreamError {
	/// Wraps a transport failure.
	pub fn unavailable(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Unavailable { endpoint, source: Box::new(src) }
	}

	/// Whether a single retry may succeed.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Unavailable { .. } => true,
			Self::Status { status, .. } => *status == 429 || *status >= 500,
			Self::Rejected { .. } | Self::Malformed { .. } => false,
		}
	}
}

/// Failures raised by token signers.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SigningError {
	/// Application identity or certificate is not a 32-character hex string.
	#[error("Application {credential} must be a 32-character hex string.")]
	InvalidCredential {
		/// Which credential failed validation.
		credential: &'static str,
	},
	/// A packed field exceeded the 16-bit length prefix.
	#[error("The {field} field is too large to pack into a token.")]
	FieldTooLarge {
		/// Field label.
		field: &'static str,
	},
	/// Token body compression failed.
	#[error("Token body could not be compressed: {message}.")]
	Compression {
		/// Underlying failure message.
		message: String,
	},
}

/// Configuration failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required environment variable is missing or blank.
	#[error("Environment variable `{var}` is required.")]
	Missing {
		/// Variable name.
		var: &'static str,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{var}` is invalid: {reason}.")]
	Invalid {
		/// Variable name.
		var: &'static str,
		/// Human-readable reason.
		reason: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Builds an [`ConfigError::Invalid`] from any displayable reason.
	pub fn invalid(var: &'static str, reason: impl Display) -> Self {
		Self::Invalid { var, reason: reason.to_string() }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
