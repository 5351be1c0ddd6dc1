pub mod cache_tier;
pub mod clock;
pub mod image_origin;
pub mod movie_provider;
pub mod placeholder_renderer;

pub use cache_tier::CacheTier;
pub use clock::Clock;
pub use image_origin::{FetchedImage, ImageOrigin};
pub use movie_provider::MovieProvider;
pub use placeholder_renderer::PlaceholderRenderer;
