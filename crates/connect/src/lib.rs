//! HTTP client for the Satchel cloud API.
//!
//! Implements the core delivery contract for the offline queue: one queued
//! payload per request, POSTed to the bucket's sync endpoint. Auth tokens
//! and the base URL are supplied by the embedding app.

mod client;
mod error;

pub use client::SyncApiClient;
pub use error::{ConnectError, Result};
