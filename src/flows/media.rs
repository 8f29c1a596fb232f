//! Media (real-time channel) token issuance.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::{Broker, ChannelTokenRequest, common},
	obs::FlowKind,
	signer::TokenSigner,
};

/// Response body for a media token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaTokenResponse {
	/// Signed media token.
	#[serde(rename = "rtcToken")]
	pub rtc_token: TokenSecret,
}

impl Broker {
	/// Validates the request and signs a media token with the requested variant.
	pub async fn issue_media_token(
		&self,
		request: ChannelTokenRequest,
	) -> Result<MediaTokenResponse> {
		common::observe(FlowKind::Media, "issue_media_token", async move {
			let grant = request.validate(self.config.max_expiry)?;
			let privilege_expiry = grant.expiry.anchor_now();
			let rtc_token = <dyn TokenSigner>::media_token(
				self.signer.as_ref(),
				grant.kind,
				&self.config.credentials,
				&grant.channel,
				&grant.uid,
				grant.role,
				privilege_expiry,
			)?;

			tracing::debug!(
				channel = %grant.channel,
				role = %grant.role,
				kind = grant.kind.as_str(),
				expiry = %grant.expiry,
				"Issued media token."
			);

			Ok(MediaTokenResponse { rtc_token })
		})
		.await
	}
}
