//! Relative token lifetimes and the absolute privilege expiry derived from them.

// self
use crate::{_prelude::*, error::RequestError};

/// Relative lifetime, in seconds, requested by a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Expiry(u32);
impl Expiry {
	/// Lifetime applied when the caller omits `expiry`.
	pub const DEFAULT: Self = Self(3_600);
	/// Upper bound applied unless configuration overrides it.
	pub const DEFAULT_MAX: Self = Self(86_400);

	/// Wraps a lifetime; zero is rejected because a zero privilege lifetime never expires.
	pub fn from_secs(secs: u32) -> Result<Self, RequestError> {
		if secs == 0 {
			return Err(RequestError::InvalidExpiry { value: secs.to_string() });
		}

		Ok(Self(secs))
	}

	/// Parses the optional `expiry` query value.
	///
	/// Absent or blank input yields [`Expiry::DEFAULT`]. Anything that is not a positive decimal
	/// integer, or that exceeds `max`, is rejected.
	pub fn parse(raw: Option<&str>, max: Expiry) -> Result<Self, RequestError> {
		let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
			return Ok(Self::DEFAULT.min(max));
		};
		let secs = match raw.parse::<u64>() {
			Ok(secs) if secs > 0 => secs,
			// Digits only but beyond `u64`; saturate so it reports as oversize.
			Err(_) if raw.bytes().all(|b| b.is_ascii_digit()) => u64::MAX,
			_ => return Err(RequestError::InvalidExpiry { value: raw.to_owned() }),
		};

		if secs > u64::from(max.0) {
			return Err(RequestError::ExpiryTooLarge { requested: secs, max: max.0 });
		}

		Ok(Self(secs as u32))
	}

	/// Lifetime in seconds.
	pub const fn as_secs(self) -> u32 {
		self.0
	}

	/// Lifetime as a signed [`Duration`].
	pub fn as_duration(self) -> Duration {
		Duration::seconds(i64::from(self.0))
	}

	/// Anchors the lifetime at `now`, producing the absolute privilege expiry.
	pub fn anchor_at(self, now: OffsetDateTime) -> PrivilegeExpiry {
		PrivilegeExpiry::new(now.replace_nanosecond(0).unwrap_or(now) + self.as_duration())
	}

	/// Anchors the lifetime at the current UTC instant.
	pub fn anchor_now(self) -> PrivilegeExpiry {
		self.anchor_at(OffsetDateTime::now_utc())
	}
}
impl Default for Expiry {
	fn default() -> Self {
		Self::DEFAULT
	}
}
impl Display for Expiry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}s", self.0)
	}
}

/// Absolute instant after which a token's privileges are no longer honored.
///
/// Only [`Expiry::anchor_at`] constructs values handed to signers, so the instant is always
/// derived from the clock rather than taken from the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrivilegeExpiry(OffsetDateTime);
impl PrivilegeExpiry {
	fn new(at: OffsetDateTime) -> Self {
		Self(at)
	}

	/// The expiry instant.
	pub const fn at(self) -> OffsetDateTime {
		self.0
	}

	/// The expiry as unix seconds.
	pub const fn unix_timestamp(self) -> i64 {
		self.0.unix_timestamp()
	}

	/// Seconds remaining between `issued_at` and the expiry, clamped to `0..=u32::MAX`.
	pub fn remaining_from(self, issued_at: OffsetDateTime) -> u32 {
		let remaining = (self.0 - issued_at).whole_seconds();

		u32::try_from(remaining.max(0)).unwrap_or(u32::MAX)
	}
}
