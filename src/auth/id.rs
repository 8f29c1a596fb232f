//! Strongly typed identifiers accepted by the issuance flows.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, error::RequestError};

macro_rules! def_id {
	($name:ident, $doc:literal, $field:literal, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Maximum accepted length in bytes.
			pub const MAX_LEN: usize = $max;

			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, RequestError> {
				let view = value.as_ref();

				validate_view($field, view, Self::MAX_LEN)?;

				Ok(Self(view.to_owned()))
			}

			/// Validates an optional raw value, treating `None` like an empty string.
			pub fn parse_opt(value: Option<&str>) -> Result<Self, RequestError> {
				Self::new(value.unwrap_or_default())
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = RequestError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($field, &value, Self::MAX_LEN)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!(stringify!($name), "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = RequestError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

def_id! { ChannelName, "Opaque name of a media channel.", "channel", 64 }
def_id! { UserId, "Identifier of the token holder (numeric uid or free-form account).", "uid", 255 }

impl UserId {
	/// Wire value of the wildcard uid.
	pub const WILDCARD: &str = "0";

	/// Whether this is exactly the wildcard uid `0`.
	///
	/// Zero-padded forms such as `00` are ordinary identifiers.
	pub fn is_wildcard(&self) -> bool {
		self.0 == Self::WILDCARD
	}
}

fn validate_view(field: &'static str, view: &str, max: usize) -> Result<(), RequestError> {
	if view.is_empty() {
		return Err(RequestError::Missing { field });
	}
	if view.len() > max {
		return Err(RequestError::TooLong { field, max });
	}

	Ok(())
}
