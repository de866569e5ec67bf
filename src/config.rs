//! Client configuration assembled once at construction.
//!
//! All fallible validation lives here; constructing an [`HttpClient`](crate::client::HttpClient)
//! from a finished [`ClientConfig`] never fails.

// std
use std::env;
// self
use crate::{_prelude::*, cookie::CookieAttributes, error::ConfigError};

/// Environment variable consulted by [`ClientConfig::from_env`] for the base URL.
pub const BASE_URL_VAR: &str = "API_BASE_URL";

/// Immutable configuration consumed by the client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every endpoint is resolved against; path always ends with `/`.
	pub base_url: Url,
	/// Path of the access-token refresh endpoint, relative to the base URL.
	pub refresh_path: String,
	/// HTTP status the server uses to signal an expired access token.
	pub expired_token_status: StatusCode,
	/// Lifetime applied to access-token cookie writes.
	pub access_token_ttl: Duration,
	/// Lifetime applied to refresh-token cookie writes.
	pub refresh_token_ttl: Duration,
	/// Attributes applied to every token cookie write.
	pub cookie_attributes: CookieAttributes,
}
impl ClientConfig {
	/// Creates a new builder seeded with the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a default configuration from the `API_BASE_URL` environment variable.
	pub fn from_env() -> Result<Self, ConfigError> {
		let raw = env::var(BASE_URL_VAR)
			.map_err(|_| ConfigError::MissingBaseUrl { variable: BASE_URL_VAR })?;
		let base_url =
			Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self::builder(base_url).build())
	}

	/// Resolves an endpoint path against the base URL.
	pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, ConfigError> {
		let trimmed = endpoint.trim_start_matches('/');

		self.base_url
			.join(trimmed)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source })
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// Base URL every endpoint is resolved against.
	pub base_url: Url,
	/// Refresh endpoint path.
	pub refresh_path: String,
	/// Expired-token status code.
	pub expired_token_status: StatusCode,
	/// Access-token cookie lifetime.
	pub access_token_ttl: Duration,
	/// Refresh-token cookie lifetime.
	pub refresh_token_ttl: Duration,
	/// Cookie attributes.
	pub cookie_attributes: CookieAttributes,
}
impl ClientConfigBuilder {
	const DEFAULT_ACCESS_TTL: Duration = Duration::minutes(30);
	const DEFAULT_REFRESH_PATH: &'static str = "auth/refresh";
	const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);

	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: Self::DEFAULT_REFRESH_PATH.into(),
			expired_token_status: StatusCode::UNAUTHORIZED,
			access_token_ttl: Self::DEFAULT_ACCESS_TTL,
			refresh_token_ttl: Self::DEFAULT_REFRESH_TTL,
			cookie_attributes: CookieAttributes::default(),
		}
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the status code that triggers a silent refresh.
	pub fn expired_token_status(mut self, status: StatusCode) -> Self {
		self.expired_token_status = status;

		self
	}

	/// Overrides the access-token cookie lifetime.
	pub fn access_token_ttl(mut self, ttl: Duration) -> Self {
		self.access_token_ttl = ttl;

		self
	}

	/// Overrides the refresh-token cookie lifetime.
	pub fn refresh_token_ttl(mut self, ttl: Duration) -> Self {
		self.refresh_token_ttl = ttl;

		self
	}

	/// Overrides the cookie attributes applied to token writes.
	pub fn cookie_attributes(mut self, attributes: CookieAttributes) -> Self {
		self.cookie_attributes = attributes;

		self
	}

	/// Consumes the builder and normalizes the resulting configuration.
	pub fn build(self) -> ClientConfig {
		let mut base_url = self.base_url;

		// `Url::join` replaces the last segment unless the base path ends with `/`.
		if !base_url.path().ends_with('/') {
			let normalized = format!("{}/", base_url.path());

			base_url.set_path(&normalized);
		}

		ClientConfig {
			base_url,
			refresh_path: self.refresh_path,
			expired_token_status: self.expired_token_status,
			access_token_ttl: self.access_token_ttl,
			refresh_token_ttl: self.refresh_token_ttl,
			cookie_attributes: self.cookie_attributes,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base() -> Url {
		Url::parse("https://api.example.com/v1").expect("Base URL fixture should parse.")
	}

	#[test]
	fn build_normalizes_the_base_path() {
		let config = ClientConfig::builder(base()).build();

		assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
	}

	#[test]
	fn endpoint_url_appends_relative_segments() {
		let config = ClientConfig::builder(base()).build();
		let url = config.endpoint_url("items/42").expect("Endpoint should resolve.");

		assert_eq!(url.as_str(), "https://api.example.com/v1/items/42");

		let slashed = config.endpoint_url("/items").expect("Leading slash should be tolerated.");

		assert_eq!(slashed.as_str(), "https://api.example.com/v1/items");
	}

	#[test]
	fn defaults_match_the_documented_contract() {
		let config = ClientConfig::builder(base()).build();

		assert_eq!(config.refresh_path, "auth/refresh");
		assert_eq!(config.expired_token_status, StatusCode::UNAUTHORIZED);
		assert_eq!(config.access_token_ttl, Duration::minutes(30));
		assert_eq!(config.refresh_token_ttl, Duration::days(7));
	}

	#[test]
	fn from_env_requires_the_variable() {
		// Serialize access to the process environment with a dedicated variable name.
		let error = match ClientConfig::from_env() {
			Err(error) if std::env::var(BASE_URL_VAR).is_err() => error,
			_ => return,
		};

		assert!(matches!(error, ConfigError::MissingBaseUrl { .. }));
	}
}
