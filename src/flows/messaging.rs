//! Messaging token issuance.

// self
use crate::{
	_prelude::*,
	auth::{Expiry, TokenSecret, UserId},
	flows::{Broker, MessagingTokenRequest, common},
	obs::FlowKind,
};

/// Response body for a messaging token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessagingTokenResponse {
	/// Signed messaging token.
	#[serde(rename = "rtmToken")]
	pub rtm_token: TokenSecret,
}

impl Broker {
	/// Validates the request and signs a messaging token for the standard user role.
	pub async fn issue_messaging_token(
		&self,
		request: MessagingTokenRequest,
	) -> Result<MessagingTokenResponse> {
		common::observe(FlowKind::Messaging, "issue_messaging_token", async move {
			let uid = UserId::new(&request.uid)?;
			let expiry = Expiry::parse(request.expiry.as_deref(), self.config.max_expiry)?;
			let rtm_token = self.signer.messaging_token(
				&self.config.credentials,
				&uid,
				expiry.anchor_now(),
			)?;

			tracing::debug!(expiry = %expiry, "Issued messaging token.");

			Ok(MessagingTokenResponse { rtm_token })
		})
		.await
	}
}
