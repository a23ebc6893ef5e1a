//! Issuer discovery through the well-known configuration document.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpResponse,
	http::{Method, Request, header::ACCEPT},
};
use openidconnect::core::CoreJsonWebKeySet;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::DiscoveryError,
	http::OidcHttpClient,
	provider::ProviderMetadata,
};

/// Path suffix of the OpenID Connect discovery document.
pub const OPENID_CONFIGURATION_PATH: &str = "/.well-known/openid-configuration";
/// Path prefix of the RFC 8414 authorization server metadata document.
pub const OAUTH_AUTHORIZATION_SERVER_PATH: &str = "/.well-known/oauth-authorization-server";

/// Discovered issuer paired with its own decorated transport.
///
/// The issuer also owns the provider's signing keys. They are fetched from `jwks_uri` over the
/// issuer transport the first time an ID token verifier needs them, then reused.
pub struct Issuer<C>
where
	C: ?Sized + OidcHttpClient,
{
	metadata: ProviderMetadata,
	http: C::Handle,
	keys: AsyncOnceCell<CoreJsonWebKeySet>,
}
impl<C> Issuer<C>
where
	C: ?Sized + OidcHttpClient,
{
	/// Wraps discovered metadata with the issuer-target transport.
	pub fn new(metadata: ProviderMetadata, http: C::Handle) -> Self {
		Self { metadata, http, keys: AsyncOnceCell::new() }
	}

	/// Provider metadata resolved during discovery.
	pub fn metadata(&self) -> &ProviderMetadata {
		&self.metadata
	}

	/// Transport decorated for [`HttpTarget::Issuer`](crate::http::HttpTarget::Issuer).
	pub fn http(&self) -> &C::Handle {
		&self.http
	}

	/// Returns the provider's signing keys, fetching them on first use.
	///
	/// Providers without a `jwks_uri` yield an empty set, which still verifies HMAC-signed
	/// tokens through the client secret. A failed fetch is not cached.
	pub async fn signing_keys(&self) -> Result<&CoreJsonWebKeySet, DiscoveryError> {
		if let Some(keys) = self.keys.get() {
			return Ok(keys);
		}

		self.keys
			.get_or_try_init(|| async {
				match &self.metadata.jwks_uri {
					Some(jwks_uri) => fetch_json::<C, _>(&self.http, jwks_uri).await,
					None => Ok(CoreJsonWebKeySet::new(Vec::new())),
				}
			})
			.await
	}
}
impl<C> Debug for Issuer<C>
where
	C: ?Sized + OidcHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issuer")
			.field("metadata", &self.metadata)
			.field("keys_cached", &self.keys.get().is_some())
			.finish()
	}
}

/// Derives the discovery document URL for `issuer`.
///
/// Issuers that already point at a `/.well-known/` document are used verbatim; otherwise the
/// OpenID Connect suffix is appended to the issuer path.
pub fn well_known_url(issuer: &Url) -> Result<Url, DiscoveryError> {
	if issuer.cannot_be_a_base() || issuer.host_str().is_none() {
		return Err(DiscoveryError::InvalidIssuerUrl { issuer: issuer.to_string() });
	}
	if has_explicit_well_known(issuer) {
		return Ok(issuer.clone());
	}

	let mut url = issuer.clone();
	let path = format!("{}{OPENID_CONFIGURATION_PATH}", issuer.path().trim_end_matches('/'));

	url.set_path(&path);
	url.set_fragment(None);

	Ok(url)
}

/// Resolves provider metadata for `issuer` using the discovery-target transport.
///
/// A 404 from the OpenID Connect location is retried once at the RFC 8414 location, unless the
/// issuer URL already names a specific well-known document.
pub async fn discover<C>(http: &C::Handle, issuer: &Url) -> Result<ProviderMetadata, DiscoveryError>
where
	C: ?Sized + OidcHttpClient,
{
	let primary = well_known_url(issuer)?;

	match fetch_json::<C, _>(http, &primary).await {
		Err(DiscoveryError::Status { status: 404, .. }) if !has_explicit_well_known(issuer) =>
			fetch_json::<C, _>(http, &authorization_server_url(issuer)).await,
		result => result,
	}
}

fn has_explicit_well_known(issuer: &Url) -> bool {
	issuer.path().contains("/.well-known/")
}

fn authorization_server_url(issuer: &Url) -> Url {
	let mut url = issuer.clone();
	let path =
		format!("{OAUTH_AUTHORIZATION_SERVER_PATH}{}", issuer.path().trim_end_matches('/'));

	url.set_path(&path);
	url.set_fragment(None);

	url
}

async fn fetch_json<C, T>(http: &C::Handle, url: &Url) -> Result<T, DiscoveryError>
where
	C: ?Sized + OidcHttpClient,
	T: DeserializeOwned,
{
	let request = Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, "application/json")
		.body(Vec::new())
		.map_err(|source| DiscoveryError::Request { url: url.to_string(), source })?;
	let response: HttpResponse =
		http.call(request).await.map_err(|e| DiscoveryError::transport(url.as_str(), e))?;
	let status = response.status();

	if !status.is_success() {
		return Err(DiscoveryError::Status { url: url.to_string(), status: status.as_u16() });
	}

	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DiscoveryError::Parse { url: url.to_string(), source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	#[test]
	fn well_known_url_appends_to_issuer_path() {
		assert_eq!(
			well_known_url(&url("https://tenant.example.com/"))
				.expect("Root issuer should derive a well-known URL.")
				.as_str(),
			"https://tenant.example.com/.well-known/openid-configuration",
		);
		assert_eq!(
			well_known_url(&url("https://login.example.com/realms/acme/"))
				.expect("Nested issuer should derive a well-known URL.")
				.as_str(),
			"https://login.example.com/realms/acme/.well-known/openid-configuration",
		);
	}

	#[test]
	fn well_known_url_keeps_explicit_documents() {
		let explicit = url("https://tenant.example.com/.well-known/openid-configuration");

		assert_eq!(
			well_known_url(&explicit).expect("Explicit documents should be kept."),
			explicit
		);
	}

	#[test]
	fn well_known_url_rejects_opaque_issuers() {
		let err = well_known_url(&url("mailto:ops@example.com"))
			.expect_err("Opaque URLs cannot carry a well-known path.");

		assert!(matches!(err, DiscoveryError::InvalidIssuerUrl { .. }));
	}

	#[test]
	fn authorization_server_url_inserts_prefix() {
		assert_eq!(
			authorization_server_url(&url("https://login.example.com/tenant/")).as_str(),
			"https://login.example.com/.well-known/oauth-authorization-server/tenant",
		);
		assert_eq!(
			authorization_server_url(&url("https://login.example.com/")).as_str(),
			"https://login.example.com/.well-known/oauth-authorization-server",
		);
	}
}
