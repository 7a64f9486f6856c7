//! Biblio - Books and Messages REST API
//!
//! This crate implements a small REST API over in-memory book and message
//! stores. Writes are guarded by a static bearer token and an exact
//! sliding-window rate limiter keyed by the caller's credential.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod store;
