//! Transport primitives for dispatching prepared requests.
//!
//! The module exposes [`HttpTransport`] so downstream crates can swap the HTTP stack
//! without touching the request pipeline. Implementations receive a fully prepared
//! [`RequestConfig`] (headers already injected) and resolve to a plain
//! `http::Response<Vec<u8>>`; refresh and retry decisions stay with the client.

// std
use std::ops::Deref;
// crates.io
use http::Response;
#[cfg(feature = "reqwest")] use http::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	request::{RequestBody, RequestConfig},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<Response<Vec<u8>>, E>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing a prepared request.
///
/// The trait is the client's only dependency on an HTTP implementation. Callers
/// provide one (typically behind `Arc<T>`), and the returned futures must be `Send`
/// so client futures can hop executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Dispatches a prepared request and collects the full response body.
	fn execute(&self, request: RequestConfig) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The transport serializes nothing itself; JSON bodies arrive pre-encoded and
/// multipart payloads carry their boundary inside the content type.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn execute(&self, request: RequestConfig) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder =
				client.request(request.method, request.url).headers(request.headers);

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(payload) =>
					builder.header(CONTENT_TYPE, "application/json").body(payload),
				RequestBody::Multipart { content_type, payload } =>
					builder.header(CONTENT_TYPE, content_type).body(payload),
			};

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut collected = Response::new(response.bytes().await?.to_vec());

			*collected.status_mut() = status;
			*collected.headers_mut() = headers;

			Ok(collected)
		})
	}
}
