pub mod cache;
pub mod health;
pub mod image;
pub mod movies;
pub mod search;

pub use cache::get_cache_stats;
pub use health::health_check;
pub use image::get_image;
pub use movies::get_movie_details;
pub use search::search_movies;
