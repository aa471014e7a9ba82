//! GNews Proxy Library
//!
//! Validates article search requests, forwards them to the GNews API, caches
//! upstream responses in memory, and filters the results by source name.

pub mod api;
pub mod cache;
pub mod cli;
pub mod news;
