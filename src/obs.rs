//! Observability helpers for broker flows.
//!
//! Every flow runs inside a span named `rte_token_broker.flow` carrying the `flow` and `stage`
//! fields. With the `metrics` feature enabled each attempt/success/failure also increments the
//! `rte_token_broker_flow_total` counter, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Broker operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Media (real-time channel) token issuance.
	Media,
	/// Messaging token issuance.
	Messaging,
	/// Media + messaging token pair issuance.
	Combined,
	/// Channel participant lookup.
	ChannelUsers,
	/// Active channel listing.
	Channels,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Media => "media",
			FlowKind::Messaging => "messaging",
			FlowKind::Combined => "combined",
			FlowKind::ChannelUsers => "channel_users",
			FlowKind::Channels => "channels",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
