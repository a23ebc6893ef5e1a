//! Configured client handle shared by every caller of the factory.
//!
//! The handle wraps the OpenID Connect library client (endpoints and credentials), the
//! client-target transport, and the negotiated extras: the expected ID token algorithm, the
//! clock tolerance applied by [`ClientHandle::id_token_verifier`], the logout capability, and
//! the diagnostics recorded during construction.

// crates.io
use chrono::{DateTime, TimeDelta, Utc};
use openidconnect::{
	AuthType, AuthUrl, ClientId, EndpointMaybeSet, EndpointNotSet, EndpointSet, IssuerUrl,
	RevocationUrl, TokenUrl, UserInfoUrl,
	core::{CoreClient, CoreIdTokenVerifier, CoreJsonWebKeySet, CoreJwsSigningAlgorithm},
};
// self
use crate::{
	_prelude::*,
	config::{AuthorizationParams, ClientAuthMethod, ClientConfig, ClientSecret},
	http::OidcHttpClient,
	provider::{Diagnostic, EndSessionParams, Issuer, LogoutCapability},
};

/// OpenID Connect library client with the authorization endpoint set and the revocation,
/// token, and UserInfo endpoints set when the provider advertises them.
pub type OidcClient = CoreClient<
	EndpointSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointMaybeSet,
	EndpointMaybeSet,
	EndpointMaybeSet,
>;

/// Ready-to-use identity provider client.
pub struct ClientHandle<C>
where
	C: ?Sized + OidcHttpClient,
{
	issuer: Arc<Issuer<C>>,
	client_id: String,
	client_secret: Option<ClientSecret>,
	id_token_signed_response_alg: CoreJwsSigningAlgorithm,
	clock_tolerance: Duration,
	clock_skew: TimeDelta,
	authorization_params: AuthorizationParams,
	oidc: OidcClient,
	http: C::Handle,
	logout: Option<LogoutCapability>,
	diagnostics: Vec<Diagnostic>,
}
impl<C> ClientHandle<C>
where
	C: ?Sized + OidcHttpClient,
{
	/// Builds the handle from configuration and the discovered issuer.
	///
	/// `diagnostics` carries the negotiation findings; a logout finding is appended when the
	/// provider cannot serve logout.
	pub fn new(
		config: &ClientConfig,
		issuer: Arc<Issuer<C>>,
		http: C::Handle,
		mut diagnostics: Vec<Diagnostic>,
	) -> Result<Self> {
		let id_token_signed_response_alg = config.signing_alg()?;
		let clock_skew = config.clock_skew()?;
		let oidc = build_oidc_client(config, &issuer);
		let logout = LogoutCapability::select(config, issuer.metadata(), &mut diagnostics);

		Ok(Self {
			issuer,
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			id_token_signed_response_alg,
			clock_tolerance: config.clock_tolerance,
			clock_skew,
			authorization_params: config.authorization_params.clone(),
			oidc,
			http,
			logout,
			diagnostics,
		})
	}

	/// Discovered issuer.
	pub fn issuer(&self) -> &Issuer<C> {
		&self.issuer
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Client secret, when configured.
	pub fn client_secret(&self) -> Option<&ClientSecret> {
		self.client_secret.as_ref()
	}

	/// Algorithm ID tokens are expected to be signed with.
	pub fn id_token_signed_response_alg(&self) -> &CoreJwsSigningAlgorithm {
		&self.id_token_signed_response_alg
	}

	/// Accepted clock skew for ID token timestamp checks.
	pub fn clock_tolerance(&self) -> Duration {
		self.clock_tolerance
	}

	/// Authorization request parameters from configuration.
	pub fn authorization_params(&self) -> &AuthorizationParams {
		&self.authorization_params
	}

	/// OpenID Connect library client for authorization URLs and token requests.
	///
	/// Pair it with [`http`](Self::http) so requests carry the client-target decoration. The
	/// library client carries no signing keys; verify ID tokens with
	/// [`id_token_verifier`](Self::id_token_verifier).
	pub fn oidc(&self) -> &OidcClient {
		&self.oidc
	}

	/// Transport decorated for [`HttpTarget::Client`](crate::http::HttpTarget::Client).
	pub fn http(&self) -> &C::Handle {
		&self.http
	}

	/// Builds an ID token verifier for this client.
	///
	/// Only the configured signing algorithm is accepted. Expiry is checked against a clock
	/// moved back by the configured tolerance, and an issue time further than the tolerance
	/// in the future is rejected. Signing keys come from
	/// [`Issuer::signing_keys`](crate::provider::Issuer::signing_keys); the client secret, when
	/// set, verifies HMAC-signed tokens.
	pub async fn id_token_verifier(&self) -> Result<CoreIdTokenVerifier<'static>> {
		let keys = self.issuer.signing_keys().await?.clone();

		Ok(self.verifier_with_keys(keys))
	}

	/// Returns the logout capability, if the provider supports one.
	pub fn logout(&self) -> Option<&LogoutCapability> {
		self.logout.as_ref()
	}

	/// Returns true when [`end_session_url`](Self::end_session_url) yields a URL.
	pub fn supports_logout(&self) -> bool {
		self.logout.is_some()
	}

	/// Builds the provider logout URL, or `None` when the provider has no logout support.
	pub fn end_session_url(&self, params: &EndSessionParams) -> Option<Url> {
		self.logout.as_ref().map(|logout| logout.url(&self.client_id, params))
	}

	/// Soft findings recorded while building the handle.
	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	fn verifier_with_keys(&self, keys: CoreJsonWebKeySet) -> CoreIdTokenVerifier<'static> {
		let client_id = ClientId::new(self.client_id.clone());
		let issuer = IssuerUrl::from_url(self.issuer.metadata().issuer.clone());
		let verifier = match &self.client_secret {
			Some(secret) => CoreIdTokenVerifier::new_confidential_client(
				client_id,
				secret.to_oidc(),
				issuer,
				keys,
			),
			None => CoreIdTokenVerifier::new_public_client(client_id, issuer, keys),
		};
		let skew = self.clock_skew;

		verifier
			.set_allowed_algs([self.id_token_signed_response_alg.clone()])
			.set_time_fn(move || skewed_now(skew))
			.set_issue_time_verifier_fn(move |issued_at| {
				check_issued_at(issued_at, Utc::now(), skew)
			})
	}
}
impl<C> Debug for ClientHandle<C>
where
	C: ?Sized + OidcHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientHandle")
			.field("issuer", &self.issuer.metadata().issuer.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("id_token_signed_response_alg", &self.id_token_signed_response_alg)
			.field("clock_tolerance", &self.clock_tolerance)
			.field("logout", &self.logout)
			.field("diagnostics", &self.diagnostics.len())
			.finish()
	}
}

fn skewed_now(skew: TimeDelta) -> DateTime<Utc> {
	let now = Utc::now();

	now.checked_sub_signed(skew).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn check_issued_at(
	issued_at: DateTime<Utc>,
	now: DateTime<Utc>,
	skew: TimeDelta,
) -> Result<(), String> {
	let latest = now.checked_add_signed(skew).unwrap_or(DateTime::<Utc>::MAX_UTC);

	if issued_at > latest {
		Err(format!("ID token issued at {issued_at}, after the latest accepted time {latest}."))
	} else {
		Ok(())
	}
}

fn build_oidc_client<C>(config: &ClientConfig, issuer: &Issuer<C>) -> OidcClient
where
	C: ?Sized + OidcHttpClient,
{
	let metadata = issuer.metadata();
	let mut oidc = CoreClient::new(
		ClientId::new(config.client_id.clone()),
		IssuerUrl::from_url(metadata.issuer.clone()),
		CoreJsonWebKeySet::new(Vec::new()),
	)
	.set_auth_uri(AuthUrl::from_url(metadata.authorization_endpoint.clone()))
	.set_revocation_url_option(metadata.revocation_endpoint.clone().map(RevocationUrl::from_url))
	.set_token_uri_option(metadata.token_endpoint.clone().map(TokenUrl::from_url))
	.set_user_info_url_option(metadata.userinfo_endpoint.clone().map(UserInfoUrl::from_url));

	let secret = match config.client_auth_method {
		ClientAuthMethod::None => None,
		_ => config.client_secret.as_ref(),
	};

	if let Some(secret) = secret {
		oidc = oidc.set_client_secret(secret.to_oidc());
	}
	if config.client_auth_method == ClientAuthMethod::ClientSecretPost {
		oidc = oidc.set_auth_type(AuthType::RequestBody);
	}

	oidc
}
