//! Closed sets of privilege roles and signing variants accepted on the wire.

// self
use crate::{_prelude::*, error::RequestError};

/// Privilege tier requested for a media channel session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
	/// Elevated tier: may join and publish audio, video, and data streams.
	Publisher,
	/// Restricted tier: may join and subscribe only.
	Audience,
}
impl Role {
	/// Returns the wire label used in request paths.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Publisher => "publisher",
			Role::Audience => "audience",
		}
	}

	/// Whether the role grants publishing privileges.
	pub const fn is_elevated(self) -> bool {
		matches!(self, Role::Publisher)
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = RequestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"publisher" => Ok(Role::Publisher),
			"audience" => Ok(Role::Audience),
			other => Err(RequestError::UnknownRole { value: other.to_owned() }),
		}
	}
}

/// Signing variant used for a media token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
	/// Token keyed by a free-form user account string.
	UserAccount,
	/// Token keyed by a numeric (or opaque) uid.
	Uid,
}
impl TokenKind {
	/// Returns the wire label used in request paths.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::UserAccount => "userAccount",
			TokenKind::Uid => "uid",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for TokenKind {
	type Err = RequestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"userAccount" => Ok(TokenKind::UserAccount),
			"uid" => Ok(TokenKind::Uid),
			other => Err(RequestError::UnknownTokenKind { value: other.to_owned() }),
		}
	}
}
