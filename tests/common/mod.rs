//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{Arc, Mutex},
	time::Duration,
};
// crates.io
use axum::{
	Router,
	body::{self, Body},
	http::{Request, Response},
};
use tower::ServiceExt;
// self
use rte_token_broker::{
	auth::{ChannelName, PrivilegeExpiry, Role, TokenSecret, UserId},
	config::BrokerConfig,
	directory::{DirectoryConfig, RestChannelDirectory},
	error::SigningError,
	flows::Broker,
	signer::{AccessTokenSigner, AppCredentials, TokenSigner},
};

pub const APP_ID: &str = "970ca35de60c44645bbae8a215061b33";
pub const APP_CERTIFICATE: &str = "5cfd2fd1755d40ecb72977518be15d3b";
pub const API_KEY: &str = "key";
pub const API_SECRET: &str = "secret";

/// One recorded signer invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignerCall {
	MediaWithUid { channel: String, uid: String, role: Role, expiry: PrivilegeExpiry },
	MediaWithAccount { channel: String, account: String, role: Role, expiry: PrivilegeExpiry },
	Messaging { uid: String, expiry: PrivilegeExpiry },
}

/// Signer that records every call and returns fixed tokens.
#[derive(Debug, Default)]
pub struct RecordingSigner {
	calls: Mutex<Vec<SignerCall>>,
}
impl RecordingSigner {
	pub fn calls(&self) -> Vec<SignerCall> {
		self.calls.lock().expect("Signer call log should not be poisoned.").clone()
	}

	fn record(&self, call: SignerCall) {
		self.calls.lock().expect("Signer call log should not be poisoned.").push(call);
	}
}
impl TokenSigner for RecordingSigner {
	fn media_token_with_uid(
		&self,
		_: &AppCredentials,
		channel: &ChannelName,
		uid: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		self.record(SignerCall::MediaWithUid {
			channel: channel.to_string(),
			uid: uid.to_string(),
			role,
			expiry: privilege_expiry,
		});

		Ok(TokenSecret::new("media-uid-token"))
	}

	fn media_token_with_account(
		&self,
		_: &AppCredentials,
		channel: &ChannelName,
		account: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		self.record(SignerCall::MediaWithAccount {
			channel: channel.to_string(),
			account: account.to_string(),
			role,
			expiry: privilege_expiry,
		});

		Ok(TokenSecret::new("media-account-token"))
	}

	fn messaging_token(
		&self,
		_: &AppCredentials,
		user_id: &UserId,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		self.record(SignerCall::Messaging { uid: user_id.to_string(), expiry: privilege_expiry });

		Ok(TokenSecret::new("messaging-token"))
	}
}

/// Configuration pointing the metadata API at `base_url`.
pub fn test_config(base_url: &str) -> BrokerConfig {
	let lookup = |key: &str| match key {
		"APP_ID" => Some(APP_ID.to_owned()),
		"APP_CERTIFICATE" => Some(APP_CERTIFICATE.to_owned()),
		"AGORA_API_KEY" => Some(API_KEY.to_owned()),
		"AGORA_API_SECRET" => Some(API_SECRET.to_owned()),
		"METADATA_BASE_URL" => Some(base_url.to_owned()),
		_ => None,
	};
	let mut config = BrokerConfig::from_lookup(lookup).expect("Test configuration should load.");

	config.directory =
		config.directory.with_retry_delays(Duration::from_millis(10), Duration::from_millis(50));

	config
}

/// Broker with a recording signer and a REST directory aimed at `base_url`.
pub fn recording_broker(base_url: &str) -> (Broker, Arc<RecordingSigner>) {
	let config = test_config(base_url);
	let signer = Arc::new(RecordingSigner::default());
	let directory = rest_directory(config.directory.clone());
	let broker = Broker::with_collaborators(config, signer.clone(), Arc::new(directory));

	(broker, signer)
}

/// Broker with the built-in access-token signer.
pub fn signing_broker(base_url: &str) -> Broker {
	let config = test_config(base_url);
	let directory = rest_directory(config.directory.clone());

	Broker::with_collaborators(config, Arc::new(AccessTokenSigner), Arc::new(directory))
}

fn rest_directory(config: DirectoryConfig) -> RestChannelDirectory {
	RestChannelDirectory::new(config).expect("HTTP client should build.")
}

/// Sends a GET through the router and returns the response plus its JSON body.
pub async fn get(router: Router, uri: &str) -> (Response<Body>, serde_json::Value) {
	let request = Request::builder()
		.uri(uri)
		.header("origin", "https://app.example.com")
		.body(Body::empty())
		.expect("Request should build.");
	let response = router.oneshot(request).await.expect("Router should not fail.");
	let (parts, body) = response.into_parts();
	let bytes = body::to_bytes(body, usize::MAX).await.expect("Body should be readable.");
	let json = if bytes.is_empty() {
		serde_json::Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Body should be JSON.")
	};

	(Response::from_parts(parts, Body::empty()), json)
}

/// Sends a CORS preflight for a GET on `uri` through the router.
pub async fn preflight(router: Router, uri: &str) -> Response<Body> {
	let request = Request::builder()
		.method("OPTIONS")
		.uri(uri)
		.header("origin", "https://app.example.com")
		.header("access-control-request-method", "GET")
		.body(Body::empty())
		.expect("Request should build.");

	router.oneshot(request).await.expect("Router should not fail.")
}
