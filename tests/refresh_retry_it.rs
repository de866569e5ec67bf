#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use silent_refresh::{
	client::{HttpClient, ReqwestHttpClient},
	config::ClientConfig,
	cookie::{
		ACCESS_TOKEN_COOKIE, CookieAttributes, CookieJar, CookieWrite, MemoryJar,
		REFRESH_TOKEN_COOKIE,
	},
};

const REFRESH_TTL: Duration = Duration::days(7);

fn build_client(server: &MockServer) -> (ReqwestHttpClient, Arc<MemoryJar>) {
	let jar_backend = Arc::new(MemoryJar::default());
	let jar: Arc<dyn CookieJar> = jar_backend.clone();
	let config = ClientConfig::builder(
		Url::parse(&server.url("/")).expect("Mock base URL should parse."),
	)
	.refresh_token_ttl(REFRESH_TTL)
	.build();
	let client = HttpClient::new(config, jar).with_bearer_auth();

	(client, jar_backend)
}

fn seed(jar: &MemoryJar, name: &str, value: &str) {
	jar.set(CookieWrite::with_ttl(
		name,
		value,
		OffsetDateTime::now_utc(),
		Duration::minutes(30),
		CookieAttributes::default(),
	));
}

fn cookie_value(jar: &MemoryJar, name: &str) -> Option<String> {
	jar.get(name).map(|secret| secret.expose().to_string())
}

#[tokio::test]
async fn expired_status_refreshes_and_retries_once() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);

	seed(&jar, ACCESS_TOKEN_COOKIE, "stale");
	seed(&jar, REFRESH_TOKEN_COOKIE, "refr");

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "stale");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.json_body(serde_json::json!({ "refreshToken": "refr" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"newtok\"}");
		})
		.await;
	let retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "newtok");
			then.status(200).body("[\"fresh\"]");
		})
		.await;
	let before = OffsetDateTime::now_utc();
	let response = client.get("items").await.expect("Retried request should reach the caller.");

	expired.assert_async().await;
	refresh.assert_async().await;
	retried.assert_async().await;

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(response.text(), "[\"fresh\"]");
	assert_eq!(cookie_value(&jar, ACCESS_TOKEN_COOKIE), Some("newtok".into()));

	// The renewed access cookie inherits the refresh-token lifetime.
	let expiry = jar
		.expiry_of(ACCESS_TOKEN_COOKIE)
		.expect("Renewed access cookie should carry an expiry.");
	let drift = (expiry - (before + REFRESH_TTL)).abs();

	assert!(drift < Duration::seconds(1), "Renewed cookie expiry drifted by {drift}.");
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.successes(), 1);
}

#[tokio::test]
async fn refresh_failure_replaces_the_original_error() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);

	seed(&jar, ACCESS_TOKEN_COOKIE, "stale");
	seed(&jar, REFRESH_TOKEN_COOKIE, "refr");

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(500).body("{}");
		})
		.await;
	let error = client.get("items").await.expect_err("Refresh failure should surface.");

	expired.assert_async().await;
	refresh.assert_async().await;

	assert_eq!(error.status().map(|status| status.as_u16()), Some(500));
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn a_second_expired_status_is_not_refreshed_again() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);

	seed(&jar, ACCESS_TOKEN_COOKIE, "stale");
	seed(&jar, REFRESH_TOKEN_COOKIE, "refr");

	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "stale");
			then.status(401).body("{}");
		})
		.await;
	let still_expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "newtok");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"newtok\"}");
		})
		.await;
	let error = client.get("items").await.expect_err("Second rejection should surface.");

	stale.assert_async().await;
	still_expired.assert_async().await;
	refresh.assert_calls_async(1).await;

	assert_eq!(error.status().map(|status| status.as_u16()), Some(401));
}

#[tokio::test]
async fn other_error_statuses_propagate_without_a_refresh() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);

	seed(&jar, ACCESS_TOKEN_COOKIE, "stale");

	let missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(404).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body("{\"accessToken\":\"newtok\"}");
		})
		.await;
	let error = client.get("items").await.expect_err("Plain error should surface.");

	missing.assert_async().await;
	refresh.assert_calls_async(0).await;

	assert_eq!(error.status().map(|status| status.as_u16()), Some(404));
	assert_eq!(client.refresh_metrics.attempts(), 0);
}

#[tokio::test]
async fn missing_refresh_cookie_sends_an_empty_grant() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);

	seed(&jar, ACCESS_TOKEN_COOKIE, "stale");

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "stale");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").json_body(serde_json::json!({}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"newtok\"}");
		})
		.await;
	let retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "newtok");
			then.status(200).body("[]");
		})
		.await;

	client.get("items").await.expect("Retried request should reach the caller.");

	expired.assert_async().await;
	refresh.assert_async().await;
	retried.assert_async().await;
}
