//! Data ingestion from the NRCS AWDB API.
//!
//! - `transport`: the HTTP seam (`Transport` trait and its reqwest impl).
//! - `awdb`: URL construction and response parsing for AWDB endpoints.

pub mod awdb;
pub mod transport;

#[cfg(test)]
pub(crate) mod fixtures;

pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
