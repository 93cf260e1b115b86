//! ssl-config - server TLS configuration generator
//!
//! This library turns the Mozilla Server Side TLS guidelines into concrete
//! configuration files for a given server software, server version and
//! OpenSSL version. It holds the version comparison engine, the guideline
//! dataset, the resolution policy and the template rendering used by the
//! `ssl-config` CLI.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod global;
pub mod render;
pub mod resolver;
pub mod sync;
pub mod version;

pub use catalog::Catalog;
pub use render::{Renderer, generate};
pub use resolver::{ResolveRequest, ResolvedState, Resolver, UnsupportedConfiguration};
pub use version::Version;
