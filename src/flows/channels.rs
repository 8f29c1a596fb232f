//! Channel metadata lookups forwarded to the [`ChannelDirectory`].

// self
use crate::{
	_prelude::*,
	directory::ChannelDirectory,
	error::RequestError,
	flows::{Broker, common},
	obs::FlowKind,
};

impl Broker {
	/// Returns the upstream `data` payload describing the users in `channel_name`.
	pub async fn list_channel_participants(&self, channel_name: &str) -> Result<JsonValue> {
		common::observe(FlowKind::ChannelUsers, "list_channel_participants", async move {
			if channel_name.is_empty() {
				return Err(RequestError::Missing { field: "channel" }.into());
			}

			let data = <dyn ChannelDirectory>::channel_users(
				self.directory.as_ref(),
				&self.config.credentials.app_id,
				channel_name,
			)
			.await?;

			Ok(data)
		})
		.await
	}

	/// Returns the upstream `data` payload listing active channels.
	pub async fn list_channels(&self) -> Result<JsonValue> {
		common::observe(FlowKind::Channels, "list_channels", async move {
			let data = <dyn ChannelDirectory>::channels(
				self.directory.as_ref(),
				&self.config.credentials.app_id,
			)
			.await?;

			Ok(data)
		})
		.await
	}
}
