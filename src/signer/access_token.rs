//! Version `007` access tokens signed with HMAC-SHA256.
//!
//! A token is `"007"` followed by the base64 encoding of a zlib-compressed body. The body is a
//! length-prefixed signature followed by the signing info it covers:
//!
//! ```text
//! signing_info = string(app_id) u32(issue_ts) u32(expire) u32(salt) u16(service_count) services
//! media        = u16(1) privileges string(channel) string(uid)
//! messaging    = u16(2) privileges string(user_id)
//! ```
//!
//! The signing key is derived from the application certificate, the issue timestamp, and the
//! salt, so two tokens for identical inputs never share a signature.

// std
use std::{collections::BTreeMap, io::Write};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::{Compression, write::ZlibEncoder};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{ChannelName, PrivilegeExpiry, Role, TokenSecret, UserId},
	error::SigningError,
	signer::{AppCredentials, TokenSigner, pack::Packer},
};

type HmacSha256 = Hmac<Sha256>;

/// Version tag prefixed to every token.
pub const ACCESS_TOKEN_VERSION: &str = "007";

const SERVICE_MEDIA: u16 = 1;
const SERVICE_MESSAGING: u16 = 2;

const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
const PRIVILEGE_PUBLISH_AUDIO: u16 = 2;
const PRIVILEGE_PUBLISH_VIDEO: u16 = 3;
const PRIVILEGE_PUBLISH_DATA: u16 = 4;
const PRIVILEGE_MESSAGING_LOGIN: u16 = 1;

const SALT_MAX: u32 = 99_999_999;

/// Built-in [`TokenSigner`] producing version `007` access tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessTokenSigner;
impl AccessTokenSigner {
	fn media(
		credentials: &AppCredentials,
		channel: &ChannelName,
		uid: String,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		let mut token = AccessToken::issue_now(credentials, privilege_expiry);
		let lifetime = token.expire;
		let mut privileges = BTreeMap::from([(PRIVILEGE_JOIN_CHANNEL, lifetime)]);

		if role.is_elevated() {
			privileges.insert(PRIVILEGE_PUBLISH_AUDIO, lifetime);
			privileges.insert(PRIVILEGE_PUBLISH_VIDEO, lifetime);
			privileges.insert(PRIVILEGE_PUBLISH_DATA, lifetime);
		}

		token.add_service(Service::Media { channel: channel.to_string(), uid, privileges });
		token.build().map(TokenSecret::new)
	}
}
impl TokenSigner for AccessTokenSigner {
	fn media_token_with_uid(
		&self,
		credentials: &AppCredentials,
		channel: &ChannelName,
		uid: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		// The wildcard uid packs as an empty account.
		let packed = if uid.is_wildcard() { String::new() } else { uid.to_string() };

		Self::media(credentials, channel, packed, role, privilege_expiry)
	}

	fn media_token_with_account(
		&self,
		credentials: &AppCredentials,
		channel: &ChannelName,
		account: &UserId,
		role: Role,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		Self::media(credentials, channel, account.to_string(), role, privilege_expiry)
	}

	fn messaging_token(
		&self,
		credentials: &AppCredentials,
		user_id: &UserId,
		privilege_expiry: PrivilegeExpiry,
	) -> Result<TokenSecret, SigningError> {
		let mut token = AccessToken::issue_now(credentials, privilege_expiry);
		let privileges = BTreeMap::from([(PRIVILEGE_MESSAGING_LOGIN, token.expire)]);

		token.add_service(Service::Messaging { user_id: user_id.to_string(), privileges });
		token.build().map(TokenSecret::new)
	}
}

#[derive(Clone, Debug)]
enum Service {
	Media { channel: String, uid: String, privileges: BTreeMap<u16, u32> },
	Messaging { user_id: String, privileges: BTreeMap<u16, u32> },
}
impl Service {
	fn kind(&self) -> u16 {
		match self {
			Service::Media { .. } => SERVICE_MEDIA,
			Service::Messaging { .. } => SERVICE_MESSAGING,
		}
	}

	fn pack(&self, packer: &mut Packer) -> Result<(), SigningError> {
		packer.u16(self.kind());

		match self {
			Service::Media { channel, uid, privileges } => {
				packer.privileges(privileges)?;
				packer.bytes("channel", channel.as_bytes())?;
				packer.bytes("uid", uid.as_bytes())
			},
			Service::Messaging { user_id, privileges } => {
				packer.privileges(privileges)?;
				packer.bytes("user_id", user_id.as_bytes())
			},
		}
	}
}

#[derive(Clone, Debug)]
struct AccessToken<'a> {
	credentials: &'a AppCredentials,
	issue_ts: u32,
	expire: u32,
	salt: u32,
	services: BTreeMap<u16, Service>,
}
impl<'a> AccessToken<'a> {
	fn new(credentials: &'a AppCredentials, issue_ts: u32, expire: u32, salt: u32) -> Self {
		Self { credentials, issue_ts, expire, salt, services: BTreeMap::new() }
	}

	fn issue_now(credentials: &'a AppCredentials, privilege_expiry: PrivilegeExpiry) -> Self {
		let now = OffsetDateTime::now_utc();
		let issue_ts = u32::try_from(now.unix_timestamp()).unwrap_or(u32::MAX);
		let expire = privilege_expiry.remaining_from(now.replace_nanosecond(0).unwrap_or(now));
		let salt = rand::rng().random_range(1..=SALT_MAX);

		Self::new(credentials, issue_ts, expire.max(1), salt)
	}

	fn add_service(&mut self, service: Service) {
		self.services.insert(service.kind(), service);
	}

	fn signing_key(&self) -> [u8; 32] {
		let certificate = self.credentials.app_certificate.expose().as_bytes();
		let issued = hmac_sha256(&self.issue_ts.to_le_bytes(), certificate);

		hmac_sha256(&self.salt.to_le_bytes(), &issued)
	}

	fn signing_info(&self) -> Result<Vec<u8>, SigningError> {
		let mut packer = Packer::default();
		let count = u16::try_from(self.services.len())
			.map_err(|_| SigningError::FieldTooLarge { field: "services" })?;

		packer.bytes("app_id", self.credentials.app_id.as_bytes())?;
		packer.u32(self.issue_ts);
		packer.u32(self.expire);
		packer.u32(self.salt);
		packer.u16(count);

		for service in self.services.values() {
			service.pack(&mut packer)?;
		}

		Ok(packer.into_bytes())
	}

	fn build(&self) -> Result<String, SigningError> {
		self.credentials.validate()?;

		let signing_info = self.signing_info()?;
		let signature = hmac_sha256(&self.signing_key(), &signing_info);
		let mut body = Packer::default();

		body.bytes("signature", &signature)?;
		body.extend(&signing_info);

		let compressed = compress(&body.into_bytes())?;

		Ok(format!("{ACCESS_TOKEN_VERSION}{}", STANDARD.encode(compressed)))
	}
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");

	mac.update(message);

	mac.finalize().into_bytes().into()
}

fn compress(body: &[u8]) -> Result<Vec<u8>, SigningError> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());

	encoder
		.write_all(body)
		.and_then(|_| encoder.finish())
		.map_err(|e| SigningError::Compression { message: e.to_string() })
}
