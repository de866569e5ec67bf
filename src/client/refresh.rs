//! Silent refresh-and-retry procedure.
//!
//! When a dispatch fails with the configured expired-token status, the client posts
//! `{ "refreshToken": .. }` to the refresh endpoint through the same single-send
//! pipeline, flushes the renewed access token into the jar, and re-issues the
//! original request once. A refresh or retry failure propagates in place of the
//! original rejection; there is no second attempt and no deduplication between
//! independently failing requests — each performs its own refresh and the jar's
//! last writer wins.

mod metrics;

pub use self::metrics::RefreshMetrics;

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	client::HttpClient,
	cookie::{ACCESS_TOKEN_COOKIE, CookieWrite, REFRESH_TOKEN_COOKIE},
	error::ConfigError,
	http::HttpTransport,
	obs::{self, PhaseOutcome, PhaseSpan, RequestPhase},
	request::{ClientResponse, RequestBody, RequestConfig},
};

/// Body of the refresh exchange; a missing refresh cookie omits the field entirely.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshGrantRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	refresh_token: Option<String>,
}

/// Subset of the refresh response the client consumes; other fields are ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshGrantResponse {
	#[serde(default)]
	access_token: Option<String>,
}

impl<C> HttpClient<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) async fn refresh_and_retry(
		&self,
		original: RequestConfig,
	) -> Result<ClientResponse> {
		const PHASE: RequestPhase = RequestPhase::Refresh;

		let span = PhaseSpan::new(PHASE, "refresh_and_retry");

		obs::record_phase_outcome(PHASE, PhaseOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let refresh_token = self
					.jar
					.get(REFRESH_TOKEN_COOKIE)
					.map(|secret| secret.expose().to_string());
				let payload = serde_json::to_vec(&RefreshGrantRequest { refresh_token })
					.map_err(ConfigError::from)?;
				let exchange = RequestConfig::new(
					Method::POST,
					self.config.endpoint_url(&self.config.refresh_path)?,
				)
				.with_body(RequestBody::Json(payload));
				// The exchange runs through the same transform pair as any other
				// request; a second expired status surfaces as a plain rejection.
				let response = self.send_once(exchange).await.inspect_err(|_| {
					self.refresh_metrics.record_failure();
				})?;
				let grant: RefreshGrantResponse = response.json().inspect_err(|_| {
					self.refresh_metrics.record_failure();
				})?;

				if let Some(token) = grant.access_token {
					// Upstream contract: the renewed access token lives for the
					// refresh-session window, not the access TTL.
					self.jar.set(CookieWrite::with_ttl(
						ACCESS_TOKEN_COOKIE,
						token,
						OffsetDateTime::now_utc(),
						self.config.refresh_token_ttl,
						self.config.cookie_attributes.clone(),
					));
				}

				obs::record_phase_outcome(RequestPhase::Retry, PhaseOutcome::Attempt);

				// The injector recomputes the bearer header from the jar, so the
				// retried request picks up the token written above.
				let retried = self.send_once(original).await;

				match &retried {
					Ok(_) => {
						obs::record_phase_outcome(RequestPhase::Retry, PhaseOutcome::Success);
						self.refresh_metrics.record_success();
					},
					Err(_) => {
						obs::record_phase_outcome(RequestPhase::Retry, PhaseOutcome::Failure);
						self.refresh_metrics.record_failure();
					},
				}

				retried
			})
			.await;

		match &result {
			Ok(_) => obs::record_phase_outcome(PHASE, PhaseOutcome::Success),
			Err(_) => obs::record_phase_outcome(PHASE, PhaseOutcome::Failure),
		}

		result
	}
}
