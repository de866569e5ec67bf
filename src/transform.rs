//! Explicit request/response transform pair applied around every send.
//!
//! The client composes these two transforms directly instead of registering hooks
//! inside a transport library, keeping the control flow visible: the
//! [`BearerInjector`] runs before each dispatch and the [`TokenHarvester`] runs on
//! every successful response.

// crates.io
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	cookie::{ACCESS_TOKEN_COOKIE, CookieAttributes, CookieJar, CookieWrite, REFRESH_TOKEN_COOKIE},
	error::ConfigError,
	request::RequestConfig,
	token,
};

/// Lower-case response header carrying a rotated refresh token.
pub const REFRESH_TOKEN_HEADER: &str = "refreshtoken";

/// Request transform that attaches the bearer header from the cookie jar.
///
/// The jar is consulted at send time, never at construction, so a token rotated by a
/// concurrent refresh is picked up by the next outgoing request automatically.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerInjector {
	requires_auth: bool,
}
impl BearerInjector {
	/// Creates an injector; `requires_auth` toggles header attachment entirely.
	pub fn new(requires_auth: bool) -> Self {
		Self { requires_auth }
	}

	/// Returns whether the injector attaches bearer headers.
	pub fn requires_auth(&self) -> bool {
		self.requires_auth
	}

	/// Applies the transform to an outgoing request.
	///
	/// Without `requires_auth` the request passes through untouched. Otherwise the
	/// access-token cookie is read, `%` placeholders decode to spaces, and the result
	/// becomes the `authorization` header verbatim. A missing cookie leaves the
	/// header unset.
	pub fn apply(
		&self,
		request: RequestConfig,
		jar: &dyn CookieJar,
	) -> Result<RequestConfig, ConfigError> {
		if !self.requires_auth {
			return Ok(request);
		}

		let Some(secret) = jar.get(ACCESS_TOKEN_COOKIE) else {
			return Ok(request);
		};
		let decoded = token::decode_cookie_token(secret.expose());
		let value = HeaderValue::from_str(&decoded)?;

		Ok(request.with_header(AUTHORIZATION, value))
	}
}

/// Response transform that flushes rotated tokens into the cookie jar.
///
/// Runs on the success path only; the response itself is handed back unmodified and
/// the cookie writes are a side effect. The `authorization` and `refreshtoken`
/// headers are independent; either may appear without the other.
#[derive(Clone, Debug)]
pub struct TokenHarvester {
	access_ttl: Duration,
	refresh_ttl: Duration,
	attributes: CookieAttributes,
}
impl TokenHarvester {
	/// Creates a harvester with the provided cookie lifetimes and attributes.
	pub fn new(access_ttl: Duration, refresh_ttl: Duration, attributes: CookieAttributes) -> Self {
		Self { access_ttl, refresh_ttl, attributes }
	}

	/// Writes any rotated tokens found in `headers` into the jar.
	pub fn harvest(&self, headers: &HeaderMap, now: OffsetDateTime, jar: &dyn CookieJar) {
		if let Some(value) = header_text(headers, AUTHORIZATION.as_str()) {
			jar.set(CookieWrite::with_ttl(
				ACCESS_TOKEN_COOKIE,
				value,
				now,
				self.access_ttl,
				self.attributes.clone(),
			));
		}
		if let Some(value) = header_text(headers, REFRESH_TOKEN_HEADER) {
			jar.set(CookieWrite::with_ttl(
				REFRESH_TOKEN_COOKIE,
				value,
				now,
				self.refresh_ttl,
				self.attributes.clone(),
			));
		}
	}
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
	headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
}
