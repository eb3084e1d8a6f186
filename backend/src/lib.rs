//! Backend library modules.
//!
//! - [`domain`]: account types, ports and the account service.
//! - [`inbound`]: the Actix Web adapter.
//! - [`outbound`]: persistence, in-memory and security adapters.
//! - [`config`]: OrthoConfig-backed settings.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
