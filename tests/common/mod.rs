#![allow(dead_code)]

pub mod fixtures;
pub mod test_server;

pub use fixtures::{omdb_unavailable, tmdb_three_results};
pub use test_server::{TestServer, TestServerBuilder};
