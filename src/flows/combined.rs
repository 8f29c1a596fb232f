//! Combined media + messaging token issuance.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::{Broker, ChannelTokenRequest, common},
	obs::FlowKind,
};

/// Response body carrying both tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombinedTokenResponse {
	/// Signed media token (uid-keyed).
	#[serde(rename = "rtcToken")]
	pub rtc_token: TokenSecret,
	/// Signed messaging token.
	#[serde(rename = "rtmToken")]
	pub rtm_token: TokenSecret,
}

impl Broker {
	/// Issues a media and a messaging token sharing one uid and privilege expiry.
	///
	/// The token type is validated but the media token is always signed with the uid-keyed
	/// variant.
	pub async fn issue_combined_token(
		&self,
		request: ChannelTokenRequest,
	) -> Result<CombinedTokenResponse> {
		common::observe(FlowKind::Combined, "issue_combined_token", async move {
			let grant = request.validate(self.config.max_expiry)?;
			let privilege_expiry = grant.expiry.anchor_now();
			let credentials = &self.config.credentials;
			let rtc_token = self.signer.media_token_with_uid(
				credentials,
				&grant.channel,
				&grant.uid,
				grant.role,
				privilege_expiry,
			)?;
			let rtm_token = self.signer.messaging_token(credentials, &grant.uid, privilege_expiry)?;

			tracing::debug!(
				channel = %grant.channel,
				role = %grant.role,
				expiry = %grant.expiry,
				"Issued combined tokens."
			);

			Ok(CombinedTokenResponse { rtc_token, rtm_token })
		})
		.await
	}
}
