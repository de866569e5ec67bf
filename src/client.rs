//! The HTTP client facade: verb methods, the explicit transform pipeline, and the
//! silent refresh hand-off.

pub mod refresh;

pub use refresh::RefreshMetrics;

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	cookie::CookieJar,
	error::{ConfigError, TransportError},
	http::HttpTransport,
	obs::{self, PhaseOutcome, PhaseSpan, RequestPhase},
	request::{ClientResponse, MultipartBody, RequestBody, RequestConfig, ResourceId},
	transform::{BearerInjector, TokenHarvester},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestHttpClient = HttpClient<ReqwestTransport>;

/// HTTP client that wraps a transport with bearer attachment and silent refresh.
///
/// The client owns the transport, the cookie jar capability, and the explicit
/// request/response transform pair. Every verb method funnels through the same
/// pipeline: inject the bearer header, dispatch, harvest rotated tokens on success,
/// and hand an expired-token rejection to the refresh procedure exactly once.
#[derive(Clone)]
pub struct HttpClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request, the refresh exchange included.
	pub transport: Arc<C>,
	/// Immutable configuration captured at construction.
	pub config: ClientConfig,
	/// Shared, externally-owned cookie jar; last writer wins.
	pub jar: Arc<dyn CookieJar>,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	injector: BearerInjector,
	harvester: TokenHarvester,
}
impl<C> HttpClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an unauthenticated client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		jar: Arc<dyn CookieJar>,
		transport: impl Into<Arc<C>>,
	) -> Self {
		let harvester = TokenHarvester::new(
			config.access_token_ttl,
			config.refresh_token_ttl,
			config.cookie_attributes.clone(),
		);

		Self {
			transport: transport.into(),
			config,
			jar,
			refresh_metrics: Default::default(),
			injector: BearerInjector::default(),
			harvester,
		}
	}

	/// Turns on bearer attachment for every outgoing request.
	///
	/// The header value is derived from the access-token cookie at send time, so a
	/// token rotated mid-flight is picked up by the next request automatically.
	pub fn with_bearer_auth(mut self) -> Self {
		self.injector = BearerInjector::new(true);

		self
	}

	/// Returns whether the client attaches bearer headers.
	pub fn requires_auth(&self) -> bool {
		self.injector.requires_auth()
	}

	/// Issues a GET request to `endpoint`.
	pub async fn get(&self, endpoint: &str) -> Result<ClientResponse> {
		let request = RequestConfig::new(Method::GET, self.config.endpoint_url(endpoint)?);

		self.dispatch(request).await
	}

	/// Issues a GET request with the provided pairs appended as a query string.
	pub async fn get_by_query<I, K, V>(&self, endpoint: &str, query: I) -> Result<ClientResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let request = RequestConfig::new(Method::GET, self.config.endpoint_url(endpoint)?)
			.with_query(query);

		self.dispatch(request).await
	}

	/// Issues a GET request to `endpoint/{id}` (path-segment interpolation).
	pub async fn get_by_params(&self, endpoint: &str, id: ResourceId) -> Result<ClientResponse> {
		let request = RequestConfig::new(Method::GET, self.id_url(endpoint, &id)?);

		self.dispatch(request).await
	}

	/// Issues a POST request with a JSON body.
	pub async fn post<T>(&self, endpoint: &str, data: &T) -> Result<ClientResponse>
	where
		T: ?Sized + Serialize,
	{
		let request = RequestConfig::new(Method::POST, self.config.endpoint_url(endpoint)?)
			.with_body(json_body(data)?);

		self.dispatch(request).await
	}

	/// Issues a POST request with a caller-built multipart payload.
	pub async fn post_multipart_form_data(
		&self,
		endpoint: &str,
		form: MultipartBody,
	) -> Result<ClientResponse> {
		let request = RequestConfig::new(Method::POST, self.config.endpoint_url(endpoint)?)
			.with_body(form.into_body());

		self.dispatch(request).await
	}

	/// Issues a PUT request with a JSON body.
	///
	/// With `Some(id)` the URL becomes `endpoint/{id}`; zero and empty-string ids are
	/// still appended (`items/0`, `items/`). With `None` the bare endpoint is used.
	pub async fn put<T>(
		&self,
		endpoint: &str,
		data: &T,
		id: Option<ResourceId>,
	) -> Result<ClientResponse>
	where
		T: ?Sized + Serialize,
	{
		let url = match id.as_ref() {
			Some(id) => self.id_url(endpoint, id)?,
			None => self.config.endpoint_url(endpoint)?,
		};
		let request = RequestConfig::new(Method::PUT, url).with_body(json_body(data)?);

		self.dispatch(request).await
	}

	/// Issues a PUT request with a caller-built multipart payload.
	pub async fn put_form_data(
		&self,
		endpoint: &str,
		form: MultipartBody,
	) -> Result<ClientResponse> {
		let request = RequestConfig::new(Method::PUT, self.config.endpoint_url(endpoint)?)
			.with_body(form.into_body());

		self.dispatch(request).await
	}

	/// Issues a PATCH request with a JSON body; pass `json!({})` for an empty patch.
	pub async fn patch<T>(&self, endpoint: &str, data: &T) -> Result<ClientResponse>
	where
		T: ?Sized + Serialize,
	{
		let request = RequestConfig::new(Method::PATCH, self.config.endpoint_url(endpoint)?)
			.with_body(json_body(data)?);

		self.dispatch(request).await
	}

	/// Issues a DELETE request to `endpoint/{id}`.
	pub async fn delete(&self, endpoint: &str, id: ResourceId) -> Result<ClientResponse> {
		let request = RequestConfig::new(Method::DELETE, self.id_url(endpoint, &id)?);

		self.dispatch(request).await
	}

	async fn dispatch(&self, request: RequestConfig) -> Result<ClientResponse> {
		const PHASE: RequestPhase = RequestPhase::Dispatch;

		let span = PhaseSpan::new(PHASE, "dispatch");

		obs::record_phase_outcome(PHASE, PhaseOutcome::Attempt);

		let result = span
			.instrument(async move {
				match self.send_once(request.clone()).await {
					Err(Error::Status { status, .. })
						if status == self.config.expired_token_status =>
						self.refresh_and_retry(request).await,
					other => other,
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_phase_outcome(PHASE, PhaseOutcome::Success),
			Err(_) => obs::record_phase_outcome(PHASE, PhaseOutcome::Failure),
		}

		result
	}

	/// Runs the transform pair around a single transport dispatch.
	///
	/// Expired-token statuses surface as plain [`Error::Status`] here; only
	/// [`dispatch`](Self::dispatch) promotes them into the refresh procedure, which
	/// keeps the refresh exchange and the retried request from recursing.
	pub(crate) async fn send_once(&self, request: RequestConfig) -> Result<ClientResponse> {
		let prepared = self.injector.apply(request, self.jar.as_ref())?;
		let response = self
			.transport
			.execute(prepared)
			.await
			.map_err(|err| Error::from(TransportError::network(err)))?;
		let status = response.status();

		if status.is_success() {
			self.harvester.harvest(
				response.headers(),
				OffsetDateTime::now_utc(),
				self.jar.as_ref(),
			);

			Ok(response.into())
		} else {
			Err(Error::Status { status, body: response.into_body() })
		}
	}

	fn id_url(&self, endpoint: &str, id: &ResourceId) -> Result<Url, ConfigError> {
		self.config.endpoint_url(&format!("{}/{}", endpoint.trim_end_matches('/'), id))
	}
}
#[cfg(feature = "reqwest")]
impl HttpClient<ReqwestTransport> {
	/// Creates an unauthenticated client backed by a default reqwest transport.
	///
	/// Use [`HttpClient::with_bearer_auth`] to turn on bearer attachment and
	/// [`HttpClient::with_transport`] to supply a customized transport instead.
	pub fn new(config: ClientConfig, jar: Arc<dyn CookieJar>) -> Self {
		Self::with_transport(config, jar, ReqwestTransport::default())
	}
}
impl<C> Debug for HttpClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("requires_auth", &self.requires_auth())
			.finish()
	}
}

fn json_body<T>(data: &T) -> Result<RequestBody, ConfigError>
where
	T: ?Sized + Serialize,
{
	Ok(RequestBody::Json(serde_json::to_vec(data).map_err(ConfigError::from)?))
}
