//! Demonstrates the silent refresh pipeline end to end: a request rejected with an
//! expired-token status triggers one refresh exchange and a transparent retry.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use silent_refresh::{
	client::HttpClient,
	config::ClientConfig,
	cookie::{
		ACCESS_TOKEN_COOKIE, CookieAttributes, CookieJar, CookieWrite, MemoryJar,
		REFRESH_TOKEN_COOKIE,
	},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/profile").header("authorization", "stale-token");
			then.status(401).body("{}");
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"fresh-token\"}");
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/profile").header("authorization", "fresh-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"name\":\"demo-user\"}");
		})
		.await;
	let jar_backend = Arc::new(MemoryJar::default());
	let jar: Arc<dyn CookieJar> = jar_backend.clone();
	let now = OffsetDateTime::now_utc();

	jar_backend.set(CookieWrite::with_ttl(
		ACCESS_TOKEN_COOKIE,
		"stale-token",
		now,
		Duration::minutes(30),
		CookieAttributes::default(),
	));
	jar_backend.set(CookieWrite::with_ttl(
		REFRESH_TOKEN_COOKIE,
		"refresh-secret",
		now,
		Duration::days(7),
		CookieAttributes::default(),
	));

	let config = ClientConfig::builder(Url::parse(&server.url("/"))?).build();
	let client = HttpClient::new(config, jar).with_bearer_auth();
	let response = client.get("profile").await?;

	expired_mock.assert_async().await;
	refresh_mock.assert_async().await;
	profile_mock.assert_async().await;

	println!("profile: {}", response.text());
	println!(
		"renewed access token: {:?}",
		jar_backend.get(ACCESS_TOKEN_COOKIE).map(|secret| secret.expose().to_string()),
	);
	println!(
		"refresh attempts: {} (successes: {})",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.successes(),
	);

	Ok(())
}
