//! Finished client configuration consumed by the factory.
//!
//! The surrounding application loads and validates configuration; the factory only reads it.
//! [`ClientConfig`] deserializes from any serde format with the defaults listed on each field,
//! and [`ClientConfigBuilder`] offers the same surface for programmatic setups with a light
//! syntactic check on `build`.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// crates.io
use chrono::TimeDelta;
use openidconnect::{ClientSecret as OidcClientSecret, core::CoreJwsSigningAlgorithm};
use serde::{Deserializer, Serializer};
// self
use crate::{_prelude::*, error::ConfigError};

/// Client secret that stays out of logs.
///
/// `Debug` never prints the value. It is handed to the OpenID Connect client for token
/// endpoint authentication and to the ID token verifier for HMAC-signed tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wraps a secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true for an empty or whitespace-only secret, which cannot authenticate.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	pub(crate) fn to_oidc(&self) -> OidcClientSecret {
		OidcClientSecret::new(self.0.clone())
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ClientSecret(<redacted>)")
	}
}

/// Client authentication modes used against the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// Public client; no secret is sent.
	None,
}

/// Authorization request parameters negotiated against the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationParams {
	/// Space-delimited `response_type` (defaults to `id_token`).
	pub response_type: String,
	/// Optional `response_mode` (defaults to `form_post`).
	pub response_mode: Option<String>,
	/// Space-delimited scopes (defaults to `openid profile email`).
	pub scope: String,
}
impl Default for AuthorizationParams {
	fn default() -> Self {
		Self {
			response_type: "id_token".into(),
			response_mode: Some("form_post".into()),
			scope: "openid profile email".into(),
		}
	}
}

/// Immutable configuration captured by [`ClientFactory`](crate::factory::ClientFactory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Issuer base URL used for discovery.
	pub issuer_base_url: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential authentication methods.
	#[serde(default)]
	pub client_secret: Option<ClientSecret>,
	/// Expected ID token signing algorithm.
	#[serde(default = "default_id_token_signing_alg")]
	pub id_token_signing_alg: String,
	/// Authorization request parameters.
	#[serde(default)]
	pub authorization_params: AuthorizationParams,
	/// Accepted clock skew for ID token timestamp checks, in whole seconds on the wire.
	#[serde(default = "default_clock_tolerance", with = "seconds")]
	pub clock_tolerance: Duration,
	/// Sends the base64 telemetry header when true.
	#[serde(default = "default_true")]
	pub enable_telemetry: bool,
	/// Requests identity provider logout support.
	#[serde(default)]
	pub idp_logout: bool,
	/// Marks the provider as Auth0 even when its hostname does not say so.
	#[serde(default)]
	pub auth0_logout: bool,
	/// Token endpoint authentication method.
	#[serde(default)]
	pub client_auth_method: ClientAuthMethod,
}
impl ClientConfig {
	/// Default ID token signing algorithm.
	pub const DEFAULT_ID_TOKEN_SIGNING_ALG: &str = "RS256";
	/// Default clock tolerance.
	pub const DEFAULT_CLOCK_TOLERANCE: Duration = Duration::seconds(60);

	/// Creates a new builder seeded with the issuer and client identifier.
	pub fn builder(issuer_base_url: Url, client_id: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(issuer_base_url, client_id)
	}

	/// Resolves [`id_token_signing_alg`](Self::id_token_signing_alg) to a JWS algorithm.
	pub fn signing_alg(&self) -> Result<CoreJwsSigningAlgorithm, ConfigError> {
		serde_json::from_value(serde_json::Value::String(self.id_token_signing_alg.clone()))
			.map_err(|_| ConfigError::UnknownSigningAlg {
				alg: self.id_token_signing_alg.clone(),
			})
	}

	/// Converts [`clock_tolerance`](Self::clock_tolerance) for the ID token verifier.
	pub fn clock_skew(&self) -> Result<TimeDelta, ConfigError> {
		let seconds = self.clock_tolerance.whole_seconds();

		if seconds < 0 {
			return Err(ConfigError::NegativeClockTolerance);
		}

		TimeDelta::try_seconds(seconds).ok_or(ConfigError::ClockToleranceOutOfRange { seconds })
	}
}

fn default_id_token_signing_alg() -> String {
	ClientConfig::DEFAULT_ID_TOKEN_SIGNING_ALG.into()
}

fn default_clock_tolerance() -> Duration {
	ClientConfig::DEFAULT_CLOCK_TOLERANCE
}

fn default_true() -> bool {
	true
}

mod seconds {
	// self
	use super::*;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}
