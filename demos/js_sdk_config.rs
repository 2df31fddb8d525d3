//! Demonstrates signing `wx.config` payloads against a mocked platform API, with the in-memory
//! ticket store absorbing the second page load.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wechat_jssdk::{
	http::{HttpPolicy, ReqwestHttpClient},
	sdk::{self, JsSdk},
	store::MemoryStore,
	upstream::UpstreamEndpoints,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token").query_param("appid", "wx-demo-app");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket").query_param("type", "jsapi");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"demo-ticket\",\"expires_in\":7200}",
			);
		})
		.await;
	let endpoints = UpstreamEndpoints::new(
		Url::parse(&server.url("/cgi-bin/token"))?,
		Url::parse(&server.url("/cgi-bin/ticket/getticket"))?,
	)?;
	let http_client = ReqwestHttpClient::from_policy(&HttpPolicy::default())?;
	let url = sdk::page_url(true, "demo.example.com", "/campaign?id=42#share");
	let signer: JsSdk<ReqwestHttpClient> = JsSdk::builder("wx-demo-app", "demo-secret", url)
		.debug(true)
		.endpoints(endpoints)
		.store(Arc::new(MemoryStore::default()))
		.build_with_http_client(http_client)?;

	for load in 1..=2 {
		let config = signer.config().await?;

		println!("Page load {load}: {}.", serde_json::to_string(&config)?);
	}

	println!(
		"Upstream fetches: {}, cache hits: {}.",
		signer.metrics().upstream_fetches(),
		signer.metrics().cache_hits()
	);

	token_mock.assert_async().await;
	ticket_mock.assert_async().await;

	Ok(())
}
