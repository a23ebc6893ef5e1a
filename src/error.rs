//! Factory-level error types shared across discovery, configuration, and client construction.

// self
use crate::_prelude::*;

/// Factory-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical factory error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Issuer discovery failed; the client could not be built.
	#[error(transparent)]
	Discovery(#[from] DiscoveryError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Failures raised while fetching provider documents (discovery metadata or signing keys).
///
/// Every variant is fatal to the `get_client` attempt that produced it. The factory keeps
/// its cache slot empty afterwards, so the next call starts discovery from scratch. Key set
/// failures surface from [`ClientHandle::id_token_verifier`](crate::client::ClientHandle::id_token_verifier)
/// and leave the issuer's key cache empty.
#[derive(Debug, ThisError)]
pub enum DiscoveryError {
	/// The issuer URL cannot carry a well-known path.
	#[error("Issuer URL `{issuer}` cannot be used for discovery.")]
	InvalidIssuerUrl {
		/// Issuer URL as configured.
		issuer: String,
	},
	/// The discovery request could not be constructed.
	#[error("Request for `{url}` could not be constructed.")]
	Request {
		/// Document URL being requested.
		url: String,
		/// Underlying request builder failure.
		#[source]
		source: oauth2::http::Error,
	},
	/// The issuer is unreachable (DNS, TCP, TLS, timeout).
	#[error("Provider document at `{url}` is unreachable.")]
	Transport {
		/// Document URL being requested.
		url: String,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The issuer answered with a non-success status.
	#[error("Provider document at `{url}` returned HTTP {status}.")]
	Status {
		/// Document URL being requested.
		url: String,
		/// HTTP status code returned by the issuer.
		status: u16,
	},
	/// The document is not valid provider metadata or a valid key set.
	#[error("Provider document at `{url}` is malformed.")]
	Parse {
		/// Document URL being requested.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl DiscoveryError {
	/// Wraps a transport-specific network error.
	pub fn transport(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { url: url.into(), source: Box::new(src) }
	}
}

/// Configuration failures raised by the builder or at factory creation.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required string field is empty.
	#[error("Configuration field `{field}` must not be empty.")]
	EmptyField {
		/// Offending field name.
		field: &'static str,
	},
	/// A code-flow response type needs a client secret for confidential authentication.
	#[error("Response type `{response_type}` requires a client secret.")]
	MissingClientSecret {
		/// Configured response type.
		response_type: String,
	},
	/// Clock tolerance must not be negative.
	#[error("Clock tolerance must not be negative.")]
	NegativeClockTolerance,
	/// Clock tolerance does not fit the ID token verifier's time arithmetic.
	#[error("Clock tolerance of {seconds} seconds is out of range.")]
	ClockToleranceOutOfRange {
		/// Configured tolerance in whole seconds.
		seconds: i64,
	},
	/// The configured ID token signing algorithm is not a JWS algorithm the verifier knows.
	#[error("ID token signing algorithm `{alg}` is not recognized.")]
	UnknownSigningAlg {
		/// Configured algorithm.
		alg: String,
	},
	/// Issuer base URL uses a scheme other than http(s).
	#[error("Issuer base URL must use http or https: {url}.")]
	UnsupportedIssuerScheme {
		/// Issuer URL that failed validation.
		url: String,
	},
	/// A transport header could not be encoded.
	#[error("Header `{header}` has an invalid value.")]
	InvalidHeaderValue {
		/// Header name.
		header: &'static str,
		/// Underlying header encoding failure.
		#[source]
		source: oauth2::http::header::InvalidHeaderValue,
	},
	/// The telemetry payload could not be serialized.
	#[error("Telemetry payload could not be serialized.")]
	Telemetry(#[source] serde_json::Error),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
