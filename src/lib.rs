//! Rust's silent-refresh HTTP client—cookie-backed bearer attachment, transparent
//! access-token renewal, and transport-aware observability over reqwest.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod token;
pub mod transform;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{HttpClient, ReqwestHttpClient},
		config::ClientConfig,
		cookie::{CookieJar, MemoryJar},
		http::ReqwestTransport,
	};

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an unauthenticated client for `config` with a fresh in-memory jar.
	pub fn build_reqwest_test_client(config: ClientConfig) -> (ReqwestHttpClient, Arc<MemoryJar>) {
		let jar_backend = Arc::new(MemoryJar::default());
		let jar: Arc<dyn CookieJar> = jar_backend.clone();
		let client = HttpClient::with_transport(config, jar, test_reqwest_transport());

		(client, jar_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use http::StatusCode;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
