#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
// self
use oidc_client_factory::{
	config::{ClientConfig, ClientConfigBuilder},
	factory::ReqwestClientFactory,
	http::ReqwestHttpClient,
	url::Url,
};

pub const CLIENT_ID: &str = "abc123";
pub const CLIENT_SECRET: &str = "secret-abc123";
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";
pub const USER_AGENT: &str = concat!("oidc-client-factory/", env!("CARGO_PKG_VERSION"));

pub fn config_builder(server: &MockServer) -> ClientConfigBuilder {
	let issuer = Url::parse(&server.url("/")).expect("Mock issuer URL should parse.");

	ClientConfig::builder(issuer, CLIENT_ID).client_secret(CLIENT_SECRET)
}

pub fn factory(builder: ClientConfigBuilder) -> ReqwestClientFactory {
	let config = builder.build().expect("Test configuration should build.");

	ReqwestClientFactory::new(config, ReqwestHttpClient::default())
		.expect("Reqwest-backed factory should build.")
}

/// Renders a discovery document for `issuer`, merging `overrides` on top.
pub fn discovery_document(issuer: &str, overrides: serde_json::Value) -> String {
	let base = issuer.trim_end_matches('/');
	let mut doc = serde_json::json!({
		"issuer": issuer,
		"authorization_endpoint": format!("{base}/authorize"),
		"token_endpoint": format!("{base}/oauth/token"),
		"jwks_uri": format!("{base}/.well-known/jwks.json"),
		"id_token_signing_alg_values_supported": ["RS256", "HS256"],
		"response_types_supported": ["code", "id_token", "id_token code"],
		"response_modes_supported": ["query", "fragment", "form_post"],
	});

	if let (Some(doc), serde_json::Value::Object(extra)) = (doc.as_object_mut(), overrides) {
		doc.extend(extra);
	}

	doc.to_string()
}

/// Serves `body` at the OpenID Connect discovery path.
pub async fn mock_discovery<'a>(server: &'a MockServer, body: String) -> Mock<'a> {
	server
		.mock_async(move |when, then| {
			when.method(GET).path(DISCOVERY_PATH);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Serves an empty JSON Web Key Set at the path advertised by [`discovery_document`].
pub async fn mock_jwks(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/jwks.json");
			then.status(200).header("content-type", "application/json").body("{\"keys\":[]}");
		})
		.await
}
