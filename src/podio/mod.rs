//! Podio API access.
//!
//! Only the authenticated session is implemented: app-grant OAuth and a
//! cached access token that is renewed shortly before it expires.

pub mod client;
pub mod error;

pub use client::PodioClient;
pub use error::PodioError;
