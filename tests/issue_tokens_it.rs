mod common;

// crates.io
use axum::http::StatusCode;
use time::OffsetDateTime;
// self
use common::{SignerCall, get, preflight, recording_broker, signing_broker};
use rte_token_broker::{
	auth::{PrivilegeExpiry, Role},
	server,
	signer::ACCESS_TOKEN_VERSION,
};

const UNUSED_UPSTREAM: &str = "http://127.0.0.1:9";

fn assert_expires_in(expiry: PrivilegeExpiry, secs: i64) {
	let expected = OffsetDateTime::now_utc().unix_timestamp() + secs;
	let drift = (expiry.unix_timestamp() - expected).abs();

	assert!(drift <= 5, "Privilege expiry should be about {secs}s from now, drift was {drift}s.");
}

#[tokio::test]
async fn ping_answers_pong_with_no_cache_and_cors_headers() {
	let (broker, _) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) = get(server::router(broker), "/ping").await;
	let headers = response.headers();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "message": "pong" }));
	assert_eq!(headers["cache-control"], "private, no-cache, no-store, must-revalidate");
	assert_eq!(headers["pragma"], "no-cache");
	assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn media_token_defaults_expiry_to_one_hour() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) = get(server::router(broker), "/rtc/lobby/publisher/uid/42").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "rtcToken": "media-uid-token" }));

	let calls = signer.calls();

	assert_eq!(calls.len(), 1);

	let SignerCall::MediaWithUid { channel, uid, role, expiry } = &calls[0] else {
		panic!("Expected a uid-keyed media token, got {calls:?}.");
	};

	assert_eq!(channel, "lobby");
	assert_eq!(uid, "42");
	assert_eq!(*role, Role::Publisher);
	assert_expires_in(*expiry, 3_600);
}

#[tokio::test]
async fn media_token_honors_explicit_expiry_and_account_variant() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) =
		get(server::router(broker), "/rtc/lobby/audience/userAccount/alice?expiry=120").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "rtcToken": "media-account-token" }));

	let calls = signer.calls();
	let SignerCall::MediaWithAccount { account, role, expiry, .. } = &calls[0] else {
		panic!("Expected an account-keyed media token, got {calls:?}.");
	};

	assert_eq!(account, "alice");
	assert_eq!(*role, Role::Audience);
	assert_expires_in(*expiry, 120);
}

#[tokio::test]
async fn unknown_role_is_rejected_before_signing() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) = get(server::router(broker), "/rtc/lobby/moderator/uid/42").await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body, serde_json::json!({ "error": "role is incorrect" }));
	assert_eq!(response.headers()["cache-control"], "private, no-cache, no-store, must-revalidate");
	assert_eq!(response.headers()["access-control-allow-origin"], "*");
	assert!(signer.calls().is_empty());
}

#[tokio::test]
async fn undecodable_query_and_path_return_json_errors() {
	let cases = [
		("/rtm/42?expiry=1&expiry=2", "query string is invalid"),
		("/rtc/lobby/publisher/uid/42?expiry=60&expiry=120", "query string is invalid"),
		("/rtm/%FF", "path is invalid"),
	];

	for (uri, message) in cases {
		let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
		let (response, body) = get(server::router(broker), uri).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(body, serde_json::json!({ "error": message }), "{uri}");
		assert_eq!(response.headers()["access-control-allow-origin"], "*", "{uri}");
		assert!(signer.calls().is_empty(), "{uri}");
	}
}

#[tokio::test]
async fn preflight_allows_any_origin() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let response = preflight(server::router(broker), "/rtc/lobby/publisher/uid/42").await;
	let headers = response.headers();

	assert!(response.status().is_success());
	assert_eq!(headers["access-control-allow-origin"], "*");
	assert!(headers.contains_key("access-control-allow-methods"));
	assert_eq!(headers["cache-control"], "private, no-cache, no-store, must-revalidate");
	assert!(signer.calls().is_empty());
}

#[tokio::test]
async fn malformed_parameters_are_rejected() {
	let cases = [
		("/rtc/lobby/publisher/jwt/42", "token type is invalid"),
		("/rtc/lobby/publisher/uid/42?expiry=soon", "expiry must be a positive integer"),
		("/rtc/lobby/publisher/uid/42?expiry=0", "expiry must be a positive integer"),
		("/rtc/lobby/publisher/uid/42?expiry=-60", "expiry must be a positive integer"),
		("/rtc/lobby/publisher/uid/42?expiry=86401", "expiry exceeds the maximum of 86400 seconds"),
		("/rtm/42?expiry=1.5", "expiry must be a positive integer"),
	];

	for (uri, message) in cases {
		let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
		let (response, body) = get(server::router(broker), uri).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(body, serde_json::json!({ "error": message }), "{uri}");
		assert!(signer.calls().is_empty(), "{uri}");
	}
}

#[tokio::test]
async fn empty_channel_is_rejected_by_the_broker() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let request = rte_token_broker::flows::ChannelTokenRequest::new("", "publisher", "uid", "42");
	let err = broker.issue_media_token(request).await.expect_err("Empty channel should fail.");

	assert_eq!(err.to_string(), "channel is required");
	assert!(signer.calls().is_empty());
}

#[tokio::test]
async fn messaging_token_accepts_a_trailing_slash() {
	for uri in ["/rtm/alice", "/rtm/alice/"] {
		let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
		let (response, body) = get(server::router(broker), uri).await;

		assert_eq!(response.status(), StatusCode::OK, "{uri}");
		assert_eq!(body, serde_json::json!({ "rtmToken": "messaging-token" }), "{uri}");

		let calls = signer.calls();
		let [SignerCall::Messaging { uid, expiry }] = calls.as_slice() else {
			panic!("Expected one messaging token, got {calls:?}.");
		};

		assert_eq!(uid, "alice");
		assert_expires_in(*expiry, 3_600);
	}
}

#[tokio::test]
async fn combined_token_always_uses_the_uid_variant() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) =
		get(server::router(broker), "/rte/lobby/publisher/userAccount/alice?expiry=600").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		body,
		serde_json::json!({ "rtcToken": "media-uid-token", "rtmToken": "messaging-token" })
	);

	let calls = signer.calls();
	let [
		SignerCall::MediaWithUid { uid: media_uid, expiry: media_expiry, .. },
		SignerCall::Messaging { uid: messaging_uid, expiry: messaging_expiry },
	] = calls.as_slice()
	else {
		panic!("Expected uid-keyed media then messaging, got {calls:?}.");
	};

	assert_eq!(media_uid, "alice");
	assert_eq!(messaging_uid, "alice");
	assert_eq!(media_expiry, messaging_expiry);
	assert_expires_in(*media_expiry, 600);
}

#[tokio::test]
async fn combined_token_still_validates_the_token_type() {
	let (broker, signer) = recording_broker(UNUSED_UPSTREAM);
	let (response, body) = get(server::router(broker), "/rte/lobby/publisher/jwt/alice").await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body, serde_json::json!({ "error": "token type is invalid" }));
	assert!(signer.calls().is_empty());
}

#[tokio::test]
async fn built_in_signer_issues_versioned_tokens() {
	let broker = signing_broker(UNUSED_UPSTREAM);
	let (response, body) =
		get(server::router(broker), "/rte/lobby/publisher/uid/42?expiry=300").await;

	assert_eq!(response.status(), StatusCode::OK);

	for field in ["rtcToken", "rtmToken"] {
		let token = body[field].as_str().expect("Token should be a string.");

		assert!(token.starts_with(ACCESS_TOKEN_VERSION), "{field}: {token}");
		assert!(token.len() > ACCESS_TOKEN_VERSION.len(), "{field}: {token}");
	}
}
