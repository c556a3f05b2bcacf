//! # swiftuuid
//!
//! High-throughput [RFC 9562] UUID generation for heavily concurrent
//! processes.
//!
//! The fast path, [`ShardedV7Generator`], combines three pieces:
//!
//! - a [`CachedClock`] whose background thread republishes the wall clock in
//!   milliseconds every 500µs, so hot callers never touch the system clock
//! - a [`ShardTable`] of 64 cache-padded, lock-free `(millisecond, counter)`
//!   trackers giving strictly increasing identifiers within each shard
//! - a [`WorkerPool`] of reusable [`WorkerState`]s, each with a fixed shard
//!   affinity and an 8 KiB buffer of pre-fetched OS entropy
//!
//! [`LazyV7Generator`] and [`V4Generator`] cover low-volume use without any
//! shared state.
//!
//! ## Example
//!
//! ```
//! use swiftuuid::{CachedClock, OsEntropy, ShardedV7Generator};
//!
//! // Process-wide entry points
//! let id = swiftuuid::generate_v7_fast().unwrap();
//! assert_eq!(id.version(), 7);
//! println!("{id}");
//!
//! // Or an explicitly owned generator
//! let generator = ShardedV7Generator::new(CachedClock::start(), OsEntropy);
//! let a = generator.generate().unwrap();
//! let b = generator.generate().unwrap();
//! assert!(a < b);
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emits `tracing` events for clock lifecycle, shard
//!   saturation, pool growth and entropy failures.
//!
//! [RFC 9562]: https://www.rfc-editor.org/rfc/rfc9562

mod config;
mod error;
mod generator;
mod global;
mod id;
mod rand;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::time::*;
