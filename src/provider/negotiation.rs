//! Soft capability checks between local configuration and provider metadata.
//!
//! Providers routinely under-report what they support, so nothing here fails. Each mismatch
//! becomes a [`Diagnostic`] that the factory logs and stores on the client handle.

// self
use crate::{_prelude::*, config::ClientConfig, provider::ProviderMetadata};

/// Non-fatal finding recorded while building a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
	/// Configured ID token signing algorithm is not advertised.
	UnsupportedSigningAlg {
		/// Configured algorithm.
		configured: String,
		/// Algorithms advertised by the provider.
		supported: Vec<String>,
	},
	/// Configured response type (normalized) is not advertised.
	UnsupportedResponseType {
		/// Normalized configured response type.
		configured: String,
		/// Normalized response types advertised by the provider.
		supported: Vec<String>,
	},
	/// Configured response mode is not advertised.
	UnsupportedResponseMode {
		/// Configured response mode.
		configured: String,
		/// Response modes advertised by the provider.
		supported: Vec<String>,
	},
	/// Logout was requested but the provider offers neither an end-session endpoint nor a
	/// known vendor fallback.
	LogoutUnsupported {
		/// Canonical issuer identifier.
		issuer: String,
	},
}
impl Diagnostic {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Diagnostic::UnsupportedSigningAlg { .. } => "unsupported_signing_alg",
			Diagnostic::UnsupportedResponseType { .. } => "unsupported_response_type",
			Diagnostic::UnsupportedResponseMode { .. } => "unsupported_response_mode",
			Diagnostic::LogoutUnsupported { .. } => "logout_unsupported",
		}
	}
}
impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Diagnostic::UnsupportedSigningAlg { configured, supported } => write!(
				f,
				"ID token algorithm {configured:?} is not supported by the issuer. Supported ID token algorithms are: {supported:?}."
			),
			Diagnostic::UnsupportedResponseType { configured, supported } => write!(
				f,
				"Response type {configured:?} is not supported by the issuer. Supported response types are: {supported:?}."
			),
			Diagnostic::UnsupportedResponseMode { configured, supported } => write!(
				f,
				"Response mode {configured:?} is not supported by the issuer. Supported response modes are: {supported:?}."
			),
			Diagnostic::LogoutUnsupported { issuer } =>
				write!(f, "Issuer {issuer:?} does not support RP-initiated logout."),
		}
	}
}

/// Sorts the whitespace-delimited tokens of a response type and joins them with one space.
pub fn normalize_response_type(value: &str) -> String {
	let mut tokens = value.split_whitespace().collect::<Vec<_>>();

	tokens.sort_unstable();

	tokens.join(" ")
}

/// Compares `config` against `metadata` and returns every mismatch found.
pub fn negotiate(config: &ClientConfig, metadata: &ProviderMetadata) -> Vec<Diagnostic> {
	let mut diagnostics = Vec::new();
	let algs = &metadata.id_token_signing_alg_values_supported;

	if !algs.contains(&config.id_token_signing_alg) {
		diagnostics.push(Diagnostic::UnsupportedSigningAlg {
			configured: config.id_token_signing_alg.clone(),
			supported: algs.clone(),
		});
	}

	let response_type = normalize_response_type(&config.authorization_params.response_type);
	let response_types = metadata
		.response_types_supported
		.iter()
		.map(|value| normalize_response_type(value))
		.collect::<Vec<_>>();

	if !response_types.contains(&response_type) {
		diagnostics.push(Diagnostic::UnsupportedResponseType {
			configured: response_type,
			supported: response_types,
		});
	}

	if let Some(mode) = config.authorization_params.response_mode.as_deref() {
		let modes = &metadata.response_modes_supported;

		if !modes.iter().any(|supported| supported == mode) {
			diagnostics.push(Diagnostic::UnsupportedResponseMode {
				configured: mode.to_owned(),
				supported: modes.clone(),
			});
		}
	}

	diagnostics
}
