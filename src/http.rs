//! Transport customization shared by discovery, the issuer, and the client.
//!
//! The factory never mutates a transport after the fact. Instead it computes one
//! [`HttpOptions`] value per [`HttpTarget`] (the library defaults from
//! [`DefaultHttpOptions`], then the caller's optional [`HttpOptionsHook`]) and asks the
//! [`OidcHttpClient`] for a handle bound to those options. Each target owns its options, so a
//! hook that rewrites headers for the client leaves discovery untouched.

mod telemetry;

pub use telemetry::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderMap, HeaderValue,
		header::{HeaderName, USER_AGENT},
	},
};
// self
use crate::{_prelude::*, config::ClientConfig, error::ConfigError};

/// Objects that receive their own decorated transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpTarget {
	/// Global discovery mechanism (well-known document fetches).
	Discovery,
	/// The discovered issuer.
	Issuer,
	/// The constructed client handle.
	Client,
}
impl HttpTarget {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpTarget::Discovery => "discovery",
			HttpTarget::Issuer => "issuer",
			HttpTarget::Client => "client",
		}
	}
}
impl Display for HttpTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-target request options stamped onto every outbound request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpOptions {
	/// Headers inserted into each request, replacing same-named request headers.
	pub headers: HeaderMap,
	/// Request timeout.
	pub timeout: Option<StdDuration>,
}
impl HttpOptions {
	/// Writes the configured headers into `request`.
	///
	/// Each configured name replaces every same-named request header, and all of its values are
	/// sent.
	pub fn apply_headers(&self, request: &mut HttpRequest) {
		let headers = request.headers_mut();

		for name in self.headers.keys() {
			headers.remove(name);

			for value in self.headers.get_all(name) {
				headers.append(name.clone(), value.clone());
			}
		}
	}
}

/// Caller hook run after the library defaults for each target.
pub type HttpOptionsHook = Arc<dyn Fn(HttpTarget, HttpOptions) -> HttpOptions + Send + Sync>;

/// Library defaults computed once from [`ClientConfig`] at factory creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultHttpOptions {
	user_agent: HeaderValue,
	telemetry: Option<HeaderValue>,
	timeout: StdDuration,
}
impl DefaultHttpOptions {
	/// Fixed per-request timeout.
	pub const TIMEOUT: StdDuration = StdDuration::from_millis(5_000);

	/// Builds the defaults; the telemetry header is only prepared when enabled.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let user_agent =
			HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
		let telemetry = if config.enable_telemetry {
			let encoded = Telemetry::current().encode()?;
			let value = HeaderValue::from_str(&encoded).map_err(|source| {
				ConfigError::InvalidHeaderValue { header: Telemetry::HEADER, source }
			})?;

			Some(value)
		} else {
			None
		};

		Ok(Self { user_agent, telemetry, timeout: Self::TIMEOUT })
	}

	/// Merges the defaults into `options`. Reapplying yields the same result.
	pub fn apply(&self, mut options: HttpOptions) -> HttpOptions {
		options.headers.insert(USER_AGENT, self.user_agent.clone());

		if let Some(telemetry) = &self.telemetry {
			options.headers.insert(HeaderName::from_static(Telemetry::HEADER), telemetry.clone());
		}

		options.timeout = Some(self.timeout);

		options
	}

	/// Returns the encoded telemetry header, when enabled.
	pub fn telemetry_header(&self) -> Option<&HeaderValue> {
		self.telemetry.as_ref()
	}
}

/// Abstraction over HTTP transports used by discovery and handed to callers for later
/// protocol calls through the OAuth library.
///
/// Handles returned by [`with_options`](OidcHttpClient::with_options) must stamp their
/// [`HttpOptions`] onto every request they execute: insert the headers (see
/// [`HttpOptions::apply_headers`]) and honor the timeout. Handles own their state so request
/// futures stay `Send` for the lifetime of the call.
pub trait OidcHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle bound to one target's options.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that applies `options` to each request for `target`.
	fn with_options(&self, target: HttpTarget, options: HttpOptions) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a fresh reqwest client with the crate's transport settings.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl OidcHttpClient for ReqwestHttpClient {
	type Handle = DecoratedHandle;
	type TransportError = ReqwestError;

	fn with_options(&self, target: HttpTarget, options: HttpOptions) -> Self::Handle {
		DecoratedHandle::new(self.0.clone(), target, options)
	}
}

#[cfg(feature = "reqwest")]
#[derive(Debug)]
struct DecoratedHttpClient {
	client: ReqwestClient,
	target: HttpTarget,
	options: HttpOptions,
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`OidcHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct DecoratedHandle(Arc<DecoratedHttpClient>);
#[cfg(feature = "reqwest")]
impl DecoratedHandle {
	fn new(client: ReqwestClient, target: HttpTarget, options: HttpOptions) -> Self {
		Self(Arc::new(DecoratedHttpClient { client, target, options }))
	}

	/// Target this handle was decorated for.
	pub fn target(&self) -> HttpTarget {
		self.0.target
	}

	/// Options stamped onto each request.
	pub fn options(&self) -> &HttpOptions {
		&self.0.options
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for DecoratedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, mut request: HttpRequest) -> Self::Future {
		let inner = Arc::clone(&self.0);

		Box::pin(async move {
			inner.options.apply_headers(&mut request);

			let mut request: reqwest::Request = request.try_into().map_err(Box::new)?;

			*request.timeout_mut() = inner.options.timeout;

			let response = inner.client.execute(request).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
