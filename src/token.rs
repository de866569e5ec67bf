//! Token secret wrapper and cookie-encoding helpers.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Decodes a cookie-stored token into its header form.
///
/// Cookie values store spaces as literal `%` placeholders; every `%` maps back to a
/// single space before the value is used as an `authorization` header.
pub fn decode_cookie_token(raw: &str) -> String {
	raw.replace('%', " ")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn decode_replaces_every_percent_with_a_space() {
		assert_eq!(decode_cookie_token("abc%def"), "abc def");
		assert_eq!(decode_cookie_token("Bearer%a%b"), "Bearer a b");
		assert_eq!(decode_cookie_token("plain"), "plain");
	}
}
