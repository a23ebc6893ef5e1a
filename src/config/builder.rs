// self
use crate::{
	_prelude::*,
	config::{AuthorizationParams, ClientAuthMethod, ClientConfig, ClientSecret},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the issuer and client identifier.
	pub fn new(issuer_base_url: Url, client_id: impl Into<String>) -> Self {
		Self {
			config: ClientConfig {
				issuer_base_url,
				client_id: client_id.into(),
				client_secret: None,
				id_token_signing_alg: ClientConfig::DEFAULT_ID_TOKEN_SIGNING_ALG.into(),
				authorization_params: AuthorizationParams::default(),
				clock_tolerance: ClientConfig::DEFAULT_CLOCK_TOLERANCE,
				enable_telemetry: true,
				idp_logout: false,
				auth0_logout: false,
				client_auth_method: ClientAuthMethod::default(),
			},
		}
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.config.client_secret = Some(ClientSecret::new(secret));

		self
	}

	/// Overrides the expected ID token signing algorithm.
	pub fn id_token_signing_alg(mut self, alg: impl Into<String>) -> Self {
		self.config.id_token_signing_alg = alg.into();

		self
	}

	/// Overrides the authorization `response_type`.
	pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
		self.config.authorization_params.response_type = response_type.into();

		self
	}

	/// Overrides the authorization `response_mode`; `None` leaves it to the provider.
	pub fn response_mode(mut self, response_mode: Option<String>) -> Self {
		self.config.authorization_params.response_mode = response_mode;

		self
	}

	/// Overrides the authorization scopes.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.config.authorization_params.scope = scope.into();

		self
	}

	/// Overrides the accepted clock skew.
	pub fn clock_tolerance(mut self, tolerance: Duration) -> Self {
		self.config.clock_tolerance = tolerance;

		self
	}

	/// Toggles the telemetry header.
	pub fn enable_telemetry(mut self, enabled: bool) -> Self {
		self.config.enable_telemetry = enabled;

		self
	}

	/// Toggles identity provider logout support.
	pub fn idp_logout(mut self, enabled: bool) -> Self {
		self.config.idp_logout = enabled;

		self
	}

	/// Marks the provider as Auth0 for the logout fallback.
	pub fn auth0_logout(mut self, enabled: bool) -> Self {
		self.config.auth0_logout = enabled;

		self
	}

	/// Overrides the token endpoint authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.config.client_auth_method = method;

		self
	}

	/// Consumes the builder and checks the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

impl ClientConfig {
	/// Syntactic checks only; provider capabilities are negotiated after discovery.
	fn validate(&self) -> Result<(), ConfigError> {
		if !matches!(self.issuer_base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedIssuerScheme {
				url: self.issuer_base_url.to_string(),
			});
		}

		ensure_not_blank("client_id", &self.client_id)?;
		ensure_not_blank("id_token_signing_alg", &self.id_token_signing_alg)?;
		ensure_not_blank(
			"authorization_params.response_type",
			&self.authorization_params.response_type,
		)?;

		self.clock_skew()?;
		self.signing_alg()?;

		let response_type = &self.authorization_params.response_type;
		let wants_code = response_type.split_whitespace().any(|token| token == "code");

		if wants_code
			&& self.client_auth_method != ClientAuthMethod::None
			&& self.client_secret.as_ref().is_none_or(ClientSecret::is_blank)
		{
			return Err(ConfigError::MissingClientSecret { response_type: response_type.clone() });
		}

		Ok(())
	}
}

fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() { Err(ConfigError::EmptyField { field }) } else { Ok(()) }
}
