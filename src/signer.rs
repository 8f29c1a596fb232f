//! Token signing contracts and the built-in access-token signer.
//!
//! The broker never inspects token contents. Flows hand validated values plus the shared
//! [`AppCredentials`] to a [`TokenSigner`] and return whatever opaque string it produces, so
//! deployments can swap in another signer without touching validation or routing.

mod access_token;
mod pack;

pub use access_token::*;

// self
use crate::{
	_prelude::*,
	auth::{ChannelName, PrivilegeExpiry, Role, TokenKind, TokenSecret, UserId},
	error::SigningError,
};

/// Application identity and signing secret shared by every issued token.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
	/// Public application identifier.
	pub app_id: String,
	/// Application certificate used as the signing secret.
	pub app_certificate: TokenSecret,
}
impl AppCredentials {
	/// Bundles an identity/certificate pair.
	pub fn new(app_id: impl Into<String>, app_certificate: impl Into<String>) -> Self {
		Self { app_id: app_id.into(), app_certificate: TokenSecret::new(app_certificate) }
	}

	/// Checks both halves are 32-character hex strings.
	pub fn validate(&self) -> Result<(), SigningError> {
		if !is_hex32(&self.app_id) {
			return Err(SigningError::InvalidCredential { credential: "identity" });
		}
		if !is_hex32(self.app_certificate.expose()) {
			return Err(SigningError::InvalidCredential { credential: "certificate" });
		}

		Ok(())
	}
}
impl Debug for AppCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppCredentials")
			.field("app_id", &self.app_id)
			.field("app_certificate", &self.app_certificate)
			.finish()
	}
}

/// Produces opaque signed tokens from validated request values.
///
/// Implementations must be pure functions of their inputs plus `credentials`; the broker
/// shares one signer across all in-flight requests.
pub trait TokenSigner
where
	Self: Send + Sync,
{
	/// Signs a media token keyed by a numeric (or opaque) uid.
	fn media_token_with_uid(
		&self,
		credentials: &AppCredentials,
		channel: &ChannelName,
		uid: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError>;

	/// Signs a media token keyed by a free-form user account.
	fn media_token_with_account(
		&self,
		credentials: &AppCredentials,
		channel: &ChannelName,
		account: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError>;

	/// Signs a messaging token for the standard user role.
	fn messaging_token(
		&self,
		credentials: &AppCredentials,
		user_id: &UserId,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError>;
}
impl dyn TokenSigner {
	/// Dispatches to the signing variant selected by `kind`.
	pub fn media_token(
		&self,
		kind: TokenKind,
		credentials: &AppCredentials,
		channel: &ChannelName,
		uid: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		match kind {
			TokenKind::UserAccount =>
				self.media_token_with_account(credentials, channel, uid, role, privilege_expiry),
			TokenKind::Uid =>
				self.media_token_with_uid(credentials, channel, uid, role, privilege_expiry),
		}
	}
}

fn is_hex32(value: &str) -> bool {
	value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}
