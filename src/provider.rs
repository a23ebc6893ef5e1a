//! Provider-facing data (metadata) and behavior (discovery, negotiation, logout).
//!
//! `discovery` fetches [`ProviderMetadata`] from the well-known document, `negotiation`
//! compares it against configuration and records soft [`Diagnostic`]s, and `logout` decides
//! which [`LogoutCapability`] a client handle receives.

pub mod discovery;
pub mod logout;
pub mod metadata;
pub mod negotiation;

pub use discovery::*;
pub use logout::*;
pub use metadata::*;
pub use negotiation::*;
