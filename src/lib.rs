//! Library exports for podio-assistant, shared between the binary and tests.

pub mod config;
pub mod models;
pub mod podio;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
