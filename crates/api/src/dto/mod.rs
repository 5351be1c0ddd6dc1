pub mod cache;
pub mod image;
pub mod movie;

pub use cache::CacheStatsResponse;
pub use image::ImageParams;
pub use movie::{proxied_image_url, MovieResponse, MoviesEnvelope, SearchParams};
