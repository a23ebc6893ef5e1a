// self
use crate::obs::DiscoveryOutcome;

/// Records a discovery outcome via the global metrics recorder (when enabled).
pub fn record_discovery_outcome(outcome: DiscoveryOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oidc_client_factory_discovery_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a soft diagnostic via the global metrics recorder (when enabled).
pub fn record_diagnostic(kind: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oidc_client_factory_diagnostic_total", "kind" => kind).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}
