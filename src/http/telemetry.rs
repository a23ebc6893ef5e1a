// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ConfigError};

/// Runtime environment reported alongside the library identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEnv {
	/// Operating system the crate was compiled for.
	pub target_os: String,
	/// CPU architecture the crate was compiled for.
	pub target_arch: String,
}

/// Library identity sent in the telemetry header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
	/// Library name.
	pub name: String,
	/// Library version.
	pub version: String,
	/// Runtime environment.
	pub env: TelemetryEnv,
}
impl Telemetry {
	/// Header carrying the encoded payload.
	pub const HEADER: &str = "auth0-client";

	/// Describes this build of the crate.
	pub fn current() -> Self {
		Self {
			name: env!("CARGO_PKG_NAME").into(),
			version: env!("CARGO_PKG_VERSION").into(),
			env: TelemetryEnv {
				target_os: std::env::consts::OS.into(),
				target_arch: std::env::consts::ARCH.into(),
			},
		}
	}

	/// Serializes the payload as JSON and encodes it with standard base64.
	pub fn encode(&self) -> Result<String, ConfigError> {
		let json = serde_json::to_vec(self).map_err(ConfigError::Telemetry)?;

		Ok(STANDARD.encode(json))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn encoded_payload_decodes_to_identity() {
		let encoded = Telemetry::current().encode().expect("Telemetry should encode.");
		let raw = STANDARD.decode(encoded).expect("Telemetry should be valid base64.");
		let decoded: Telemetry =
			serde_json::from_slice(&raw).expect("Telemetry should be valid JSON.");

		assert_eq!(decoded.name, "oidc-client-factory");
		assert_eq!(decoded.version, env!("CARGO_PKG_VERSION"));
		assert_eq!(decoded.env.target_os, std::env::consts::OS);
		assert_eq!(decoded.env.target_arch, std::env::consts::ARCH);
	}
}
