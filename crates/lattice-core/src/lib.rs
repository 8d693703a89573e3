//! Shared primitives used across Lattice crates

mod context;
mod error;

pub use context::RequestContext;
pub use error::HttpError;
