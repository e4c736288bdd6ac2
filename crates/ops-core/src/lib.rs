//! Request-dispatch core for the content-operations platform API.
//!
//! Maps a logical operation name plus JSON arguments onto an authorization context, a single
//! HTTP request against the remote resource tree, and a uniform result/error envelope.
//!
//! It intentionally contains **no** business logic for tenants, brands, sources, prompts,
//! workers or generations: the remote service owns all of that.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod normalize;
pub mod request;
pub mod semantics;
pub mod transport;

pub use catalog::{AuthClass, CatalogProfile, Operation, OperationCatalog};
pub use config::OpsConfig;
pub use dispatch::ContentOps;
pub use error::{OpsError, Result};
pub use normalize::Outcome;
