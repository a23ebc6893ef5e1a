//! Optional observability helpers for the client factory.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `oidc_client_factory.factory` with a `stage` field,
//!   plus one debug event per [`Diagnostic`](crate::provider::Diagnostic) under the
//!   `oidc_client_factory::client` target.
//! - Enable `metrics` to increment `oidc_client_factory_discovery_total` (labeled by
//!   `outcome`) and `oidc_client_factory_diagnostic_total` (labeled by `kind`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Steps of the first `get_client` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FactoryStage {
	/// Entire first-call initialization.
	Initialize,
	/// Well-known document fetch.
	Discovery,
	/// Capability checks.
	Negotiation,
	/// Client handle construction, including the logout capability.
	Construction,
}
impl FactoryStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FactoryStage::Initialize => "initialize",
			FactoryStage::Discovery => "discovery",
			FactoryStage::Negotiation => "negotiation",
			FactoryStage::Construction => "construction",
		}
	}
}
impl Display for FactoryStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each discovery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscoveryOutcome {
	/// Discovery started.
	Attempt,
	/// Metadata resolved.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl DiscoveryOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DiscoveryOutcome::Attempt => "attempt",
			DiscoveryOutcome::Success => "success",
			DiscoveryOutcome::Failure => "failure",
		}
	}
}
impl Display for DiscoveryOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs and counts a soft finding.
pub fn report_diagnostic(diagnostic: &crate::provider::Diagnostic) {
	emit_diagnostic(diagnostic);
	record_diagnostic(diagnostic.kind());
}
