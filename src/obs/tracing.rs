// self
use crate::{_prelude::*, obs::FactoryStage, provider::Diagnostic};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by the factory.
#[derive(Clone, Debug)]
pub struct FactorySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FactorySpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: FactoryStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("oidc_client_factory.factory", stage = stage.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> FactorySpanGuard {
		#[cfg(feature = "tracing")]
		{
			FactorySpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FactorySpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`FactorySpan::entered`].
pub struct FactorySpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FactorySpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FactorySpanGuard(..)")
	}
}

/// Emits one debug event for `diagnostic`.
pub fn emit_diagnostic(diagnostic: &Diagnostic) {
	#[cfg(feature = "tracing")]
	{
		match diagnostic {
			Diagnostic::UnsupportedSigningAlg { configured, supported }
			| Diagnostic::UnsupportedResponseType { configured, supported }
			| Diagnostic::UnsupportedResponseMode { configured, supported } => tracing::debug!(
				target: "oidc_client_factory::client",
				kind = diagnostic.kind(),
				configured = configured.as_str(),
				supported = ?supported,
				"{diagnostic}"
			),
			Diagnostic::LogoutUnsupported { issuer } => tracing::debug!(
				target: "oidc_client_factory::client",
				kind = diagnostic.kind(),
				issuer = issuer.as_str(),
				"{diagnostic}"
			),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = diagnostic;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn diagnostics_emit_without_subscriber() {
		emit_diagnostic(&Diagnostic::LogoutUnsupported { issuer: "https://x.example/".into() });
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FactorySpan::new(FactoryStage::Discovery);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
