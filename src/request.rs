//! Request and response value objects passed through the pipeline.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method, Response};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransientError};

/// Outgoing request configuration handed to the transport.
///
/// The value is cloneable so the refresh procedure can re-issue the original request
/// byte-for-byte; header injection happens copy-with-override at send time.
#[derive(Clone, Debug)]
pub struct RequestConfig {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved request URL.
	pub url: Url,
	/// Headers attached by the caller or the request transform.
	pub headers: HeaderMap,
	/// Request body.
	pub body: RequestBody,
}
impl RequestConfig {
	/// Creates a bodiless request for the provided method and URL.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: RequestBody::Empty }
	}

	/// Attaches a body to the request.
	pub fn with_body(mut self, body: RequestBody) -> Self {
		self.body = body;

		self
	}

	/// Returns a copy with the provided header set, replacing any existing value.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Appends query-string pairs to the request URL.
	pub fn with_query<I, K, V>(mut self, query: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		{
			let mut pairs = self.url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key.as_ref(), value.as_ref());
			}
		}

		self
	}
}

/// Request body variants understood by every transport.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// Pre-serialized JSON payload sent as `application/json`.
	Json(Vec<u8>),
	/// Caller-built multipart payload; the boundary travels inside the content type.
	Multipart {
		/// Full `multipart/form-data` content type including the boundary parameter.
		content_type: String,
		/// Encoded multipart payload.
		payload: Vec<u8>,
	},
}

/// Pre-built multipart payload supplied by the caller.
///
/// The client only forwards the content type; assembling parts and boundaries is the
/// caller's responsibility.
#[derive(Clone, Debug)]
pub struct MultipartBody {
	content_type: String,
	payload: Vec<u8>,
}
impl MultipartBody {
	/// Wraps an encoded multipart payload and its content type.
	pub fn new(content_type: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
		Self { content_type: content_type.into(), payload: payload.into() }
	}

	/// Returns the content type, boundary included.
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	pub(crate) fn into_body(self) -> RequestBody {
		RequestBody::Multipart { content_type: self.content_type, payload: self.payload }
	}
}

/// Path-segment resource identifier.
///
/// Zero and empty-string identifiers stay addressable: `ResourceId::new(0)` resolves
/// to `items/0` and `ResourceId::new("")` to `items/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceId(String);
impl ResourceId {
	/// Builds an identifier from anything renderable as a path segment.
	pub fn new(value: impl Display) -> Self {
		Self(value.to_string())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Completed response handed back to the caller.
#[derive(Clone, Debug)]
pub struct ClientResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ClientResponse {
	/// HTTP status code of the response.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw body bytes.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response, returning the body bytes.
	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Deserializes the body as JSON, reporting the failing path on malformed input.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ResponseParse { source, status: Some(self.status.as_u16()) }.into()
		})
	}

	/// Returns the body as text, replacing invalid UTF-8.
	pub fn text(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}
impl From<Response<Vec<u8>>> for ClientResponse {
	fn from(response: Response<Vec<u8>>) -> Self {
		let (parts, body) = response.into_parts();

		Self { status: parts.status, headers: parts.headers, body }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn with_query_appends_pairs() {
		let url = Url::parse("https://api.example.com/items").expect("URL fixture should parse.");
		let request = RequestConfig::new(Method::GET, url).with_query([("q", "a"), ("page", "2")]);

		assert_eq!(request.url.query(), Some("q=a&page=2"));
	}

	#[test]
	fn with_header_replaces_existing_values() {
		let url = Url::parse("https://api.example.com/items").expect("URL fixture should parse.");
		let request = RequestConfig::new(Method::GET, url)
			.with_header(http::header::AUTHORIZATION, HeaderValue::from_static("old"))
			.with_header(http::header::AUTHORIZATION, HeaderValue::from_static("new"));

		assert_eq!(request.headers.get(http::header::AUTHORIZATION).map(|v| v.as_bytes()), Some(&b"new"[..]));
	}

	#[test]
	fn resource_id_keeps_sentinel_values() {
		assert_eq!(ResourceId::new(0).as_str(), "0");
		assert_eq!(ResourceId::new("").as_str(), "");
		assert_eq!(ResourceId::new(42).to_string(), "42");
	}

	#[test]
	fn json_reports_the_failing_path() {
		let response = ClientResponse {
			status: StatusCode::OK,
			headers: HeaderMap::new(),
			body: b"{\"accessToken\":7}".to_vec(),
		};
		let error = response
			.json::<std::collections::HashMap<String, String>>()
			.expect_err("Mistyped field should fail to parse.");

		assert!(error.to_string().contains("malformed"));
	}
}
