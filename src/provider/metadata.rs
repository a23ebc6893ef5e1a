//! Provider metadata as read from the discovery document.

// crates.io
use serde::Deserializer;
use serde_json::Value;
// self
use crate::_prelude::*;

/// Provider metadata resolved from the discovery document.
///
/// Capability lists are lenient: a missing, `null`, or non-array field becomes an empty list,
/// and non-string members are skipped. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
	/// Canonical issuer identifier.
	pub issuer: Url,
	/// Authorization endpoint.
	pub authorization_endpoint: Url,
	/// Token endpoint; implicit-only providers may omit it.
	#[serde(default)]
	pub token_endpoint: Option<Url>,
	/// UserInfo endpoint.
	#[serde(default)]
	pub userinfo_endpoint: Option<Url>,
	/// JSON Web Key Set location.
	#[serde(default)]
	pub jwks_uri: Option<Url>,
	/// Token revocation endpoint.
	#[serde(default)]
	pub revocation_endpoint: Option<Url>,
	/// RP-initiated logout endpoint.
	#[serde(default)]
	pub end_session_endpoint: Option<Url>,
	/// Supported ID token signing algorithms.
	#[serde(default, deserialize_with = "lenient_strings")]
	pub id_token_signing_alg_values_supported: Vec<String>,
	/// Supported space-delimited response types.
	#[serde(default, deserialize_with = "lenient_strings")]
	pub response_types_supported: Vec<String>,
	/// Supported response modes.
	#[serde(default, deserialize_with = "lenient_strings")]
	pub response_modes_supported: Vec<String>,
	/// Supported scopes.
	#[serde(default, deserialize_with = "lenient_strings")]
	pub scopes_supported: Vec<String>,
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let values = match Value::deserialize(deserializer)? {
		Value::Array(values) => values
			.into_iter()
			.filter_map(|value| match value {
				Value::String(s) => Some(s),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	};

	Ok(values)
}
