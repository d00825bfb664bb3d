//! Streamify - batch HLS transcoder
//!
//! This library crate exposes the binary's wiring for integration testing.

pub mod config;
pub mod job;
