//! HTTP surface: axum router, handlers, response headers, and error-to-status mapping.

// crates.io
use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{PathRejection, QueryRejection},
	},
	http::{
		HeaderValue, StatusCode,
		header::{CACHE_CONTROL, PRAGMA},
	},
	response::{IntoResponse, Response},
	routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
	cors::{Any, CorsLayer},
	set_header::SetResponseHeaderLayer,
	trace::TraceLayer,
};
// self
use crate::{
	_prelude::*,
	error::{RequestError, UpstreamError},
	flows::{
		Broker, ChannelTokenRequest, CombinedTokenResponse, HealthResponse, MediaTokenResponse,
		MessagingTokenRequest, MessagingTokenResponse,
	},
};

const NO_CACHE: &str = "private, no-cache, no-store, must-revalidate";
const NO_CACHE_PRAGMA: &str = "no-cache";

/// Optional `?expiry=` query parameter shared by the token routes.
#[derive(Clone, Debug, Default, Deserialize)]
struct ExpiryQuery {
	expiry: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

/// Builds the router with every route and the shared response layers.
pub fn router(broker: Broker) -> Router {
	let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
	let cache_control =
		SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
	let pragma =
		SetResponseHeaderLayer::overriding(PRAGMA, HeaderValue::from_static(NO_CACHE_PRAGMA));

	Router::new()
		.route("/ping", get(ping))
		.route("/rtc/{channel}/{role}/{tokentype}/{uid}", get(media_token))
		.route("/rtm/{uid}", get(messaging_token))
		.route("/rtm/{uid}/", get(messaging_token))
		.route("/rte/{channel}/{role}/{tokentype}/{uid}", get(combined_token))
		.route("/channelUsers/{channelName}", get(channel_users))
		.route("/channels", get(channels))
		.with_state(broker)
		.layer(cors)
		.layer(cache_control)
		.layer(pragma)
		.layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(broker: Broker) -> std::io::Result<()> {
	let listener = TcpListener::bind(broker.config.listen).await?;

	tracing::info!(addr = %listener.local_addr()?, "Token broker listening.");

	axum::serve(listener, router(broker)).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Shutdown signal received."),
		Err(e) => {
			tracing::error!(error = %e, "Ctrl-C handler could not be installed.");

			std::future::pending::<()>().await;
		},
	}
}

fn path_params<T>(path: Result<Path<T>, PathRejection>) -> Result<T> {
	path.map(|Path(params)| params)
		.map_err(|rejection| RequestError::InvalidPath { reason: rejection.body_text() }.into())
}

fn expiry_param(query: Result<Query<ExpiryQuery>, QueryRejection>) -> Result<Option<String>> {
	query.map(|Query(query)| query.expiry)
		.map_err(|rejection| RequestError::InvalidQuery { reason: rejection.body_text() }.into())
}

async fn ping(State(broker): State<Broker>) -> Json<HealthResponse> {
	Json(broker.health())
}

async fn media_token(
	State(broker): State<Broker>,
	path: Result<Path<(String, String, String, String)>, PathRejection>,
	query: Result<Query<ExpiryQuery>, QueryRejection>,
) -> Result<Json<MediaTokenResponse>> {
	let (channel, role, token_kind, uid) = path_params(path)?;
	let request =
		ChannelTokenRequest::new(channel, role, token_kind, uid).with_expiry(expiry_param(query)?);

	Ok(Json(broker.issue_media_token(request).await?))
}

async fn messaging_token(
	State(broker): State<Broker>,
	path: Result<Path<String>, PathRejection>,
	query: Result<Query<ExpiryQuery>, QueryRejection>,
) -> Result<Json<MessagingTokenResponse>> {
	let request = MessagingTokenRequest::new(path_params(path)?).with_expiry(expiry_param(query)?);

	Ok(Json(broker.issue_messaging_token(request).await?))
}

async fn combined_token(
	State(broker): State<Broker>,
	path: Result<Path<(String, String, String, String)>, PathRejection>,
	query: Result<Query<ExpiryQuery>, QueryRejection>,
) -> Result<Json<CombinedTokenResponse>> {
	let (channel, role, token_kind, uid) = path_params(path)?;
	let request =
		ChannelTokenRequest::new(channel, role, token_kind, uid).with_expiry(expiry_param(query)?);

	Ok(Json(broker.issue_combined_token(request).await?))
}

async fn channel_users(
	State(broker): State<Broker>,
	path: Result<Path<String>, PathRejection>,
) -> Result<Json<JsonValue>> {
	let channel_name = path_params(path)?;

	Ok(Json(broker.list_channel_participants(&channel_name).await?))
}

async fn channels(State(broker): State<Broker>) -> Result<Json<JsonValue>> {
	Ok(Json(broker.list_channels().await?))
}

impl Error {
	/// HTTP status returned for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			Error::Upstream(UpstreamError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
			Error::Upstream(
				UpstreamError::Rejected { .. }
				| UpstreamError::Status { .. }
				| UpstreamError::Malformed { .. },
			) => StatusCode::BAD_GATEWAY,
			Error::Signing(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		(self.status_code(), Json(ErrorBody { error: self.to_string() })).into_response()
	}
}
