pub mod resolve_image;

pub use resolve_image::{clean_image_url, image_cache_key, placeholder_cache_key, ResolveImageUseCase};
