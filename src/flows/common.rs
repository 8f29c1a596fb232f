//! Shared helpers for flow implementations (request validation, span + outcome bookkeeping).

// self
use crate::{
	_prelude::*,
	auth::{ChannelName, Expiry, Role, TokenKind, UserId},
	error::RequestError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Raw parameters for channel-scoped token requests, as received from the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ChannelTokenRequest {
	/// Channel the token grants access to.
	pub channel: String,
	/// Requested privilege role (`publisher` or `audience`).
	pub role: String,
	/// Requested signing variant (`userAccount` or `uid`).
	#[serde(rename = "tokentype")]
	pub token_kind: String,
	/// Identity of the token holder.
	pub uid: String,
	/// Optional relative lifetime in seconds.
	#[serde(default)]
	pub expiry: Option<String>,
}
impl ChannelTokenRequest {
	/// Creates a request without an explicit expiry.
	pub fn new(
		channel: impl Into<String>,
		role: impl Into<String>,
		token_kind: impl Into<String>,
		uid: impl Into<String>,
	) -> Self {
		Self {
			channel: channel.into(),
			role: role.into(),
			token_kind: token_kind.into(),
			uid: uid.into(),
			expiry: None,
		}
	}

	/// Sets the raw `expiry` value.
	pub fn with_expiry(mut self, expiry: Option<impl Into<String>>) -> Self {
		self.expiry = expiry.map(Into::into);

		self
	}

	/// Validates fields in order: channel, uid, role, token type, expiry.
	pub fn validate(&self, max_expiry: Expiry) -> Result<ChannelGrant, RequestError> {
		let channel = ChannelName::new(&self.channel)?;
		let uid = UserId::new(&self.uid)?;
		let role = self.role.parse()?;
		let kind = self.token_kind.parse()?;
		let expiry = Expiry::parse(self.expiry.as_deref(), max_expiry)?;

		Ok(ChannelGrant { channel, uid, role, kind, expiry })
	}
}

/// Channel-scoped token request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelGrant {
	/// Validated channel name.
	pub channel: ChannelName,
	/// Validated token holder.
	pub uid: UserId,
	/// Recognized privilege role.
	pub role: Role,
	/// Recognized signing variant.
	pub kind: TokenKind,
	/// Relative lifetime within the configured bound.
	pub expiry: Expiry,
}

/// Raw parameters for a messaging token request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessagingTokenRequest {
	/// Identity of the messaging user.
	pub uid: String,
	/// Optional relative lifetime in seconds.
	#[serde(default)]
	pub expiry: Option<String>,
}
impl MessagingTokenRequest {
	/// Creates a request without an explicit expiry.
	pub fn new(uid: impl Into<String>) -> Self {
		Self { uid: uid.into(), expiry: None }
	}

	/// Sets the raw `expiry` value.
	pub fn with_expiry(mut self, expiry: Option<impl Into<String>>) -> Self {
		self.expiry = expiry.map(Into::into);

		self
	}
}

/// Runs `fut` inside a flow span and records attempt/success/failure counters.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	obs::record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span
		.instrument(async move {
			let result = fut.await;

			if let Err(e) = &result {
				log_failure(e);
			}

			result
		})
		.await;

	match &result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}

	result
}

fn log_failure(e: &Error) {
	match e {
		Error::InvalidRequest(e) => tracing::debug!(error = %e, "Rejected invalid request."),
		Error::Upstream(e) => tracing::warn!(error = %e, "Channel metadata lookup failed."),
		Error::Signing(e) => tracing::error!(error = %e, "Token signing failed."),
		Error::Config(e) => tracing::error!(error = %e, "Broker is misconfigured."),
	}
}
