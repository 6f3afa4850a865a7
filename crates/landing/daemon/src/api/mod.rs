//! HTTP API for landing-daemon

pub mod rest;

pub use rest::create_router;
