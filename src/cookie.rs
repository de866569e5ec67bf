//! Cookie-store contracts and the built-in in-memory jar.
//!
//! The jar is modeled as an explicit capability handed to the client at construction
//! (`Arc<dyn CookieJar>`) instead of ambient global state. It is a shared,
//! externally-owned resource: any in-flight request may read or write it, writes are
//! not coordinated, and the last writer wins.

pub mod memory;

pub use memory::MemoryJar;

// self
use crate::{_prelude::*, token::TokenSecret};

/// Cookie key holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "ACCESS_TOKEN";
/// Cookie key holding the longer-lived refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "REFRESH_TOKEN";

/// Cookie storage capability consumed by the client.
///
/// Implementations back onto whatever jar the embedding application owns (browser
/// jar behind FFI, in-process map, test fixture). They must be `Send + Sync` so a
/// single jar can serve every in-flight request.
pub trait CookieJar
where
	Self: Send + Sync,
{
	/// Returns the live value stored under `name`, if any.
	///
	/// Expired entries read as absent.
	fn get(&self, name: &str) -> Option<TokenSecret>;

	/// Persists or replaces a cookie. Last writer wins.
	fn set(&self, write: CookieWrite);
}

/// A single cookie write: name, value, absolute expiry, and attributes.
#[derive(Clone, Debug)]
pub struct CookieWrite {
	/// Cookie name.
	pub name: String,
	/// Cookie value; redacted in debug output.
	pub value: TokenSecret,
	/// Absolute expiry instant.
	pub expires_at: OffsetDateTime,
	/// Attributes applied to the write.
	pub attributes: CookieAttributes,
}
impl CookieWrite {
	/// Builds a write from a name, value, and time-to-live measured from `now`.
	pub fn with_ttl(
		name: impl Into<String>,
		value: impl Into<String>,
		now: OffsetDateTime,
		ttl: Duration,
		attributes: CookieAttributes,
	) -> Self {
		Self {
			name: name.into(),
			value: TokenSecret::new(value),
			expires_at: now + ttl,
			attributes,
		}
	}
}

/// Fixed cookie attributes applied to every token write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieAttributes {
	/// Cookie path.
	pub path: String,
	/// SameSite policy.
	pub same_site: SameSite,
	/// Whether the cookie is restricted to secure transports.
	pub secure: bool,
}
impl Default for CookieAttributes {
	fn default() -> Self {
		Self { path: "/".into(), same_site: SameSite::Lax, secure: true }
	}
}

/// SameSite policy values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
	/// Cookies are withheld from all cross-site requests.
	Strict,
	#[default]
	/// Cookies accompany top-level cross-site navigation only.
	Lax,
	/// Cookies accompany every request; requires `secure`.
	None,
}
impl SameSite {
	/// Returns the attribute value as it appears on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			SameSite::Strict => "Strict",
			SameSite::Lax => "Lax",
			SameSite::None => "None",
		}
	}
}
impl Display for SameSite {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn write_debug_redacts_the_value() {
		let write = CookieWrite::with_ttl(
			ACCESS_TOKEN_COOKIE,
			"secret-token",
			OffsetDateTime::now_utc(),
			Duration::minutes(30),
			CookieAttributes::default(),
		);
		let rendered = format!("{write:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("secret-token"));
	}

	#[test]
	fn default_attributes_pin_the_root_path() {
		let attributes = CookieAttributes::default();

		assert_eq!(attributes.path, "/");
		assert_eq!(attributes.same_site, SameSite::Lax);
		assert!(attributes.secure);
	}
}
