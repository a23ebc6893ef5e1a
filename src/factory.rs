//! Lazily initialized, memoized client factory.
//!
//! [`ClientFactory::get_client`] runs discovery, capability negotiation, and client
//! construction on first use, then hands every later caller the same [`Arc<ClientHandle>`].
//! The cache slot belongs to the factory instance, so independent factories (one per tenant,
//! say) never share state. Concurrent first callers wait on the same in-flight
//! initialization, which bounds discovery to one successful run per factory. A failed run
//! leaves the slot empty and the next call starts over.

// self
use crate::{
	_prelude::*,
	client::ClientHandle,
	config::ClientConfig,
	http::{DefaultHttpOptions, HttpOptions, HttpOptionsHook, HttpTarget, OidcHttpClient},
	obs::{self, DiscoveryOutcome, FactorySpan, FactoryStage},
	provider::{self, Issuer},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Factory specialized for the crate's default reqwest transport.
pub type ReqwestClientFactory = ClientFactory<ReqwestHttpClient>;

/// Produces and caches one [`ClientHandle`] for a fixed configuration.
pub struct ClientFactory<C>
where
	C: ?Sized + OidcHttpClient,
{
	config: ClientConfig,
	http: Arc<C>,
	defaults: DefaultHttpOptions,
	hook: Option<HttpOptionsHook>,
	slot: AsyncOnceCell<Arc<ClientHandle<C>>>,
}
impl<C> ClientFactory<C>
where
	C: ?Sized + OidcHttpClient,
{
	/// Captures `config` and prepares the transport defaults; no network traffic happens
	/// until [`get_client`](Self::get_client).
	pub fn new(config: ClientConfig, http: impl Into<Arc<C>>) -> Result<Self> {
		let defaults = DefaultHttpOptions::from_config(&config)?;

		Ok(Self { config, http: http.into(), defaults, hook: None, slot: AsyncOnceCell::new() })
	}

	/// Installs a hook that adjusts each target's options after the library defaults.
	pub fn with_http_options_hook<F>(mut self, hook: F) -> Self
	where
		F: 'static + Send + Sync + Fn(HttpTarget, HttpOptions) -> HttpOptions,
	{
		self.hook = Some(Arc::new(hook));

		self
	}

	/// Configuration captured at creation time.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Options handed to the transport for `target`.
	pub fn http_options(&self, target: HttpTarget) -> HttpOptions {
		let options = self.defaults.apply(HttpOptions::default());

		match &self.hook {
			Some(hook) => hook(target, options),
			None => options,
		}
	}

	/// Returns the cached handle without waiting, if initialization already succeeded.
	pub fn cached(&self) -> Option<Arc<ClientHandle<C>>> {
		self.slot.get().cloned()
	}

	/// Returns the shared client handle, building it on first use.
	pub async fn get_client(&self) -> Result<Arc<ClientHandle<C>>> {
		if let Some(handle) = self.slot.get() {
			return Ok(Arc::clone(handle));
		}

		self.slot.get_or_try_init(|| self.initialize()).await.map(Arc::clone)
	}

	async fn initialize(&self) -> Result<Arc<ClientHandle<C>>> {
		let span = FactorySpan::new(FactoryStage::Initialize);

		span.instrument(async move {
			let metadata = self.discover().await?;
			let issuer = Arc::new(Issuer::new(metadata, self.transport(HttpTarget::Issuer)));
			let diagnostics = {
				let _guard = FactorySpan::new(FactoryStage::Negotiation).entered();

				provider::negotiate(&self.config, issuer.metadata())
			};
			let handle = FactorySpan::new(FactoryStage::Construction)
				.instrument(async {
					ClientHandle::new(
						&self.config,
						issuer,
						self.transport(HttpTarget::Client),
						diagnostics,
					)
				})
				.await?;

			for diagnostic in handle.diagnostics() {
				obs::report_diagnostic(diagnostic);
			}

			Ok(Arc::new(handle))
		})
		.await
	}

	async fn discover(&self) -> Result<provider::ProviderMetadata> {
		let http = self.transport(HttpTarget::Discovery);

		obs::record_discovery_outcome(DiscoveryOutcome::Attempt);

		let result = FactorySpan::new(FactoryStage::Discovery)
			.instrument(provider::discover::<C>(&http, &self.config.issuer_base_url))
			.await;

		match &result {
			Ok(_) => obs::record_discovery_outcome(DiscoveryOutcome::Success),
			Err(_) => obs::record_discovery_outcome(DiscoveryOutcome::Failure),
		}

		Ok(result?)
	}

	fn transport(&self, target: HttpTarget) -> C::Handle {
		self.http.with_options(target, self.http_options(target))
	}
}
#[cfg(feature = "reqwest")]
impl ClientFactory<ReqwestHttpClient> {
	/// Creates a factory that provisions its own reqwest-backed transport.
	pub fn from_config(config: ClientConfig) -> Result<Self> {
		let http = ReqwestHttpClient::new()?;

		Self::new(config, http)
	}
}
impl<C> Debug for ClientFactory<C>
where
	C: ?Sized + OidcHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientFactory")
			.field("issuer_base_url", &self.config.issuer_base_url.as_str())
			.field("client_id", &self.config.client_id)
			.field("hook_set", &self.hook.is_some())
			.field("cached", &self.slot.get().is_some())
			.finish()
	}
}
