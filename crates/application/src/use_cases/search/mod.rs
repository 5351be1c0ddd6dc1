pub mod search_movies;

pub use search_movies::{stale_key, SearchMoviesUseCase, TierCachePolicy};
