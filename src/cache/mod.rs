//! Cache module for storing upstream responses in memory
//!
//! This module provides a TTL cache that keeps values for a fixed duration and
//! discards expired entries lazily, the next time their key is read. There is
//! no capacity bound and no background sweeper.

mod ttl;

pub use ttl::TtlCache;
