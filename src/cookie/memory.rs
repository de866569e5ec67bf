//! Thread-safe in-memory [`CookieJar`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	cookie::{CookieAttributes, CookieJar, CookieWrite},
	token::TokenSecret,
};

#[derive(Clone, Debug)]
struct StoredCookie {
	value: TokenSecret,
	expires_at: OffsetDateTime,
	#[allow(dead_code)]
	attributes: CookieAttributes,
}

/// Thread-safe jar that keeps cookies in-process for tests and demos.
///
/// Reads treat expired entries as absent; concurrent writers race with
/// last-writer-wins semantics, matching the browser jar the trait abstracts.
#[derive(Clone, Debug, Default)]
pub struct MemoryJar(Arc<RwLock<HashMap<String, StoredCookie>>>);
impl MemoryJar {
	/// Returns the expiry instant recorded for `name`, if the cookie exists.
	///
	/// Exposed for inspection in tests; expired entries still report their instant.
	pub fn expiry_of(&self, name: &str) -> Option<OffsetDateTime> {
		self.0.read().get(name).map(|cookie| cookie.expires_at)
	}

	/// Removes a cookie by name, returning whether it was present.
	pub fn remove(&self, name: &str) -> bool {
		self.0.write().remove(name).is_some()
	}
}
impl CookieJar for MemoryJar {
	fn get(&self, name: &str) -> Option<TokenSecret> {
		let guard = self.0.read();
		let cookie = guard.get(name)?;

		if cookie.expires_at <= OffsetDateTime::now_utc() {
			return None;
		}

		Some(cookie.value.clone())
	}

	fn set(&self, write: CookieWrite) {
		let stored = StoredCookie {
			value: write.value,
			expires_at: write.expires_at,
			attributes: write.attributes,
		};

		self.0.write().insert(write.name, stored);
	}
}
