//! Logout URL capability, including the Auth0 fallback for providers without an
//! end-session endpoint.

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	provider::{Diagnostic, ProviderMetadata},
};

/// Hostname suffix identifying Auth0 tenants.
pub const AUTH0_DOMAIN_SUFFIX: &str = ".auth0.com";
/// Auth0 logout path, joined onto the issuer.
pub const AUTH0_LOGOUT_PATH: &str = "/v2/logout";

const RESERVED_END_SESSION_PARAMS: [&str; 4] =
	["post_logout_redirect_uri", "id_token_hint", "state", "client_id"];

/// Caller-supplied inputs for a logout URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndSessionParams {
	/// Where the provider should send the user after logout.
	pub post_logout_redirect_uri: Option<String>,
	/// Previously issued ID token.
	pub id_token_hint: Option<String>,
	/// Opaque state echoed back to the post-logout redirect.
	pub state: Option<String>,
	/// Additional query parameters for standards-based endpoints.
	pub extra: BTreeMap<String, String>,
}
impl EndSessionParams {
	/// Creates empty parameters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the post-logout redirect target.
	pub fn post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.post_logout_redirect_uri = Some(uri.into());

		self
	}

	/// Sets the ID token hint.
	pub fn id_token_hint(mut self, hint: impl Into<String>) -> Self {
		self.id_token_hint = Some(hint.into());

		self
	}

	/// Sets the state value.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Adds an extra query parameter.
	pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

/// How a client handle builds logout URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoutCapability {
	/// Standards-based RP-initiated logout at the advertised endpoint.
	EndSession {
		/// Advertised end-session endpoint.
		endpoint: Url,
	},
	/// Auth0 `/v2/logout` fallback.
	Auth0 {
		/// Canonical issuer identifier the logout path is joined onto.
		issuer: Url,
	},
}
impl LogoutCapability {
	/// Picks the capability for `metadata`, recording a diagnostic when logout was requested
	/// but nothing fits.
	///
	/// An advertised end-session endpoint always wins. Without one, the Auth0 fallback applies
	/// only when `idp_logout` is on and either `auth0_logout` is set or the issuer hostname
	/// ends with [`AUTH0_DOMAIN_SUFFIX`].
	pub fn select(
		config: &ClientConfig,
		metadata: &ProviderMetadata,
		diagnostics: &mut Vec<Diagnostic>,
	) -> Option<Self> {
		if let Some(endpoint) = &metadata.end_session_endpoint {
			return Some(Self::EndSession { endpoint: endpoint.clone() });
		}
		if !config.idp_logout {
			return None;
		}
		if config.auth0_logout || is_auth0_issuer(&metadata.issuer) {
			return Some(Self::Auth0 { issuer: metadata.issuer.clone() });
		}

		diagnostics.push(Diagnostic::LogoutUnsupported { issuer: metadata.issuer.to_string() });

		None
	}

	/// Builds the logout URL for `client_id`.
	///
	/// For [`Auth0`](Self::Auth0), `returnTo` is only sent when a post-logout redirect is
	/// given, so the tenant's default logout redirect applies otherwise instead of an empty
	/// `returnTo=` value.
	pub fn url(&self, client_id: &str, params: &EndSessionParams) -> Url {
		match self {
			Self::EndSession { endpoint } => end_session_url(endpoint, client_id, params),
			Self::Auth0 { issuer } => auth0_logout_url(issuer, client_id, params),
		}
	}
}

fn is_auth0_issuer(issuer: &Url) -> bool {
	issuer.host_str().is_some_and(|host| host.ends_with(AUTH0_DOMAIN_SUFFIX))
}

fn end_session_url(endpoint: &Url, client_id: &str, params: &EndSessionParams) -> Url {
	let mut url = endpoint.clone();

	{
		let mut query = url.query_pairs_mut();

		if let Some(uri) = &params.post_logout_redirect_uri {
			query.append_pair("post_logout_redirect_uri", uri);
		}
		if let Some(hint) = &params.id_token_hint {
			query.append_pair("id_token_hint", hint);
		}
		if let Some(state) = &params.state {
			query.append_pair("state", state);
		}

		query.append_pair("client_id", client_id);

		for (key, value) in &params.extra {
			if !RESERVED_END_SESSION_PARAMS.contains(&key.as_str()) {
				query.append_pair(key, value);
			}
		}
	}

	url
}

fn auth0_logout_url(issuer: &Url, client_id: &str, params: &EndSessionParams) -> Url {
	let mut url = issuer.clone();
	let path = format!("{}{AUTH0_LOGOUT_PATH}", issuer.path().trim_end_matches('/'));

	url.set_path(&path);
	url.set_query(None);
	url.set_fragment(None);

	{
		let mut query = url.query_pairs_mut();

		if let Some(return_to) = &params.post_logout_redirect_uri {
			query.append_pair("returnTo", return_to);
		}

		query.append_pair("client_id", client_id);
	}

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(idp_logout: bool, auth0_logout: bool) -> ClientConfig {
		let issuer = Url::parse("https://login.example.com/").expect("Issuer URL should parse.");

		ClientConfig::builder(issuer, "abc123")
			.idp_logout(idp_logout)
			.auth0_logout(auth0_logout)
			.build()
			.expect("Test configuration should build.")
	}

	fn metadata(issuer: &str, end_session: Option<&str>) -> ProviderMetadata {
		serde_json::from_value(serde_json::json!({
			"issuer": issuer,
			"authorization_endpoint": format!("{issuer}authorize"),
			"end_session_endpoint": end_session,
		}))
		.expect("Test metadata should deserialize.")
	}

	fn pairs(url: &Url) -> Vec<(String, String)> {
		url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[test]
	fn advertised_endpoint_wins_over_vendor_fallback() {
		let mut diagnostics = Vec::new();
		let capability = LogoutCapability::select(
			&config(true, true),
			&metadata("https://tenant.auth0.com/", Some("https://tenant.auth0.com/oidc/logout")),
			&mut diagnostics,
		);

		assert!(matches!(capability, Some(LogoutCapability::EndSession { .. })));
		assert!(diagnostics.is_empty());
	}

	#[test]
	fn auth0_hostname_enables_fallback() {
		let mut diagnostics = Vec::new();
		let capability = LogoutCapability::select(
			&config(true, false),
			&metadata("https://tenant.eu.auth0.com/", None),
			&mut diagnostics,
		)
		.expect("Auth0 hostnames should enable the logout fallback.");
		let url = capability.url(
			"abc123",
			&EndSessionParams::new().post_logout_redirect_uri("https://app.example/done"),
		);

		assert_eq!(url.host_str(), Some("tenant.eu.auth0.com"));
		assert_eq!(url.path(), "/v2/logout");
		assert_eq!(
			pairs(&url),
			vec![
				("returnTo".into(), "https://app.example/done".into()),
				("client_id".into(), "abc123".into()),
			],
		);
		assert!(diagnostics.is_empty());
	}

	#[test]
	fn auth0_url_omits_return_to_without_redirect() {
		let mut diagnostics = Vec::new();
		let capability = LogoutCapability::select(
			&config(true, true),
			&metadata("https://login.example.com/", None),
			&mut diagnostics,
		)
		.expect("The Auth0 flag should enable the logout fallback.");
		let url = capability.url("abc123", &EndSessionParams::new());

		assert_eq!(url.path(), "/v2/logout");
		assert_eq!(pairs(&url), vec![("client_id".into(), "abc123".into())]);
	}

	#[test]
	fn lookalike_hostnames_do_not_match() {
		let mut diagnostics = Vec::new();
		let capability = LogoutCapability::select(
			&config(true, false),
			&metadata("https://auth0.com.example.net/", None),
			&mut diagnostics,
		);

		assert!(capability.is_none());
		assert_eq!(diagnostics, vec![Diagnostic::LogoutUnsupported {
			issuer: "https://auth0.com.example.net/".into()
		}]);
	}

	#[test]
	fn logout_not_requested_stays_silent() {
		let mut diagnostics = Vec::new();
		let capability = LogoutCapability::select(
			&config(false, false),
			&metadata("https://login.example.com/", None),
			&mut diagnostics,
		);

		assert!(capability.is_none());
		assert!(diagnostics.is_empty());
	}

	#[test]
	fn end_session_url_keeps_endpoint_query_and_skips_reserved_extras() {
		let capability = LogoutCapability::EndSession {
			endpoint: Url::parse("https://login.example.com/logout?tenant=acme")
				.expect("Endpoint URL should parse."),
		};
		let params = EndSessionParams::new()
			.post_logout_redirect_uri("https://app.example/done")
			.id_token_hint("header.payload.sig")
			.state("xyz")
			.extra_param("client_id", "spoofed")
			.extra_param("ui_locales", "en");
		let url = capability.url("abc123", &params);

		assert_eq!(url.path(), "/logout");
		assert_eq!(
			pairs(&url),
			vec![
				("tenant".into(), "acme".into()),
				("post_logout_redirect_uri".into(), "https://app.example/done".into()),
				("id_token_hint".into(), "header.payload.sig".into()),
				("state".into(), "xyz".into()),
				("client_id".into(), "abc123".into()),
				("ui_locales".into(), "en".into()),
			],
		);
	}

	#[test]
	fn auth0_url_joins_issuer_path() {
		let capability = LogoutCapability::Auth0 {
			issuer: Url::parse("https://custom.example.com/tenant/")
				.expect("Issuer URL should parse."),
		};
		let url = capability.url("abc123", &EndSessionParams::new());

		assert_eq!(url.as_str(), "https://custom.example.com/tenant/v2/logout?client_id=abc123");
	}
}
