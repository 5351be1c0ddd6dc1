pub mod http;
pub mod omdb;
pub mod tmdb;

pub use http::classify_error;
pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;
