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
	cookie::{ACCESS_TOKEN_COOKIE, CookieJar, MemoryJar, REFRESH_TOKEN_COOKIE},
};

const ACCESS_TTL: Duration = Duration::minutes(30);
const REFRESH_TTL: Duration = Duration::days(7);

fn build_client(server: &MockServer) -> (ReqwestHttpClient, Arc<MemoryJar>) {
	let jar_backend = Arc::new(MemoryJar::default());
	let jar: Arc<dyn CookieJar> = jar_backend.clone();
	let config = ClientConfig::builder(
		Url::parse(&server.url("/")).expect("Mock base URL should parse."),
	)
	.access_token_ttl(ACCESS_TTL)
	.refresh_token_ttl(REFRESH_TTL)
	.build();

	(HttpClient::new(config, jar), jar_backend)
}

fn cookie_value(jar: &MemoryJar, name: &str) -> Option<String> {
	jar.get(name).map(|secret| secret.expose().to_string())
}

fn assert_expiry_close(jar: &MemoryJar, name: &str, expected: OffsetDateTime) {
	let expiry = jar.expiry_of(name).expect("Cookie should carry an expiry instant.");
	let drift = (expiry - expected).abs();

	assert!(drift < Duration::seconds(1), "Expiry drifted by {drift} for `{name}`.");
}

#[tokio::test]
async fn authorization_header_rotates_the_access_cookie() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(200).header("authorization", "tok1").body("[]");
		})
		.await;
	let before = OffsetDateTime::now_utc();

	client.get("items").await.expect("GET should succeed.");

	mock.assert_async().await;

	assert_eq!(cookie_value(&jar, ACCESS_TOKEN_COOKIE), Some("tok1".into()));
	assert!(cookie_value(&jar, REFRESH_TOKEN_COOKIE).is_none());
	assert_expiry_close(&jar, ACCESS_TOKEN_COOKIE, before + ACCESS_TTL);
}

#[tokio::test]
async fn both_headers_rotate_both_cookies_independently() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(200)
				.header("authorization", "tok1")
				.header("refreshtoken", "ref1")
				.body("[]");
		})
		.await;
	let before = OffsetDateTime::now_utc();

	client.get("items").await.expect("GET should succeed.");

	mock.assert_async().await;

	assert_eq!(cookie_value(&jar, ACCESS_TOKEN_COOKIE), Some("tok1".into()));
	assert_eq!(cookie_value(&jar, REFRESH_TOKEN_COOKIE), Some("ref1".into()));
	assert_expiry_close(&jar, ACCESS_TOKEN_COOKIE, before + ACCESS_TTL);
	assert_expiry_close(&jar, REFRESH_TOKEN_COOKIE, before + REFRESH_TTL);
}

#[tokio::test]
async fn refresh_header_alone_leaves_the_access_cookie_untouched() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(200).header("refreshtoken", "ref1").body("[]");
		})
		.await;

	client.get("items").await.expect("GET should succeed.");

	mock.assert_async().await;

	assert!(cookie_value(&jar, ACCESS_TOKEN_COOKIE).is_none());
	assert_eq!(cookie_value(&jar, REFRESH_TOKEN_COOKIE), Some("ref1".into()));
}

#[tokio::test]
async fn error_responses_do_not_rotate_cookies() {
	let server = MockServer::start_async().await;
	let (client, jar) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items");
			then.status(500).header("authorization", "tok1").body("{}");
		})
		.await;
	let error = client.get("items").await.expect_err("Server error should surface.");

	mock.assert_async().await;

	assert_eq!(error.status().map(|status| status.as_u16()), Some(500));
	assert!(cookie_value(&jar, ACCESS_TOKEN_COOKIE).is_none());
}
