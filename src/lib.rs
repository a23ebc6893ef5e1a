//! Lazily discovered, memoized OpenID Connect client factory.
//!
//! Discover the issuer once, negotiate capabilities without failing on provider quirks,
//! decorate every transport, and hand out one shared client handle built on the
//! `openidconnect` client and ID token verifier.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::OnceCell as AsyncOnceCell;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
pub use openidconnect;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing as _, tracing_subscriber as _};
