pub mod cache;
pub mod details;
pub mod image;
pub mod search;

pub use cache::{GetCacheStatsUseCase, SweepExpiredEntriesUseCase};
pub use details::GetMovieDetailsUseCase;
pub use image::ResolveImageUseCase;
pub use search::{SearchMoviesUseCase, TierCachePolicy};
