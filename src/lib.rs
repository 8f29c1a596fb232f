//! Stateless token broker for real-time media and messaging sessions.
//!
//! The [`flows::Broker`] validates caller input, signs tokens through a [`signer::TokenSigner`],
//! and proxies channel metadata lookups through a [`directory::ChannelDirectory`]. The
//! [`server`] module exposes it over HTTP.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod server;
pub mod signer;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// The `rte-token-server` binary reports startup failures through `color-eyre`.
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
