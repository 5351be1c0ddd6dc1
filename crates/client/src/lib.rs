//! Client-side request coordination for the CineFetch HTTP API.
//!
//! Debounces search-as-you-type, deduplicates identical in-flight requests,
//! orders work by priority under per-lane concurrency ceilings and keeps a
//! small TTL cache in front of the network.

pub mod cache;
pub mod client;
pub mod debouncer;
pub mod errors;
pub mod queue;

pub use cache::{ClientCache, TtlClass};
pub use client::{ImageBody, MovieClient, MoviesPage};
pub use debouncer::{Debounced, Debouncer};
pub use errors::CoordinatorError;
pub use queue::RequestQueue;
