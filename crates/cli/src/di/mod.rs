pub mod cache;
pub mod providers;
pub mod use_cases;

pub use cache::CacheServices;
pub use providers::ProviderServices;
pub use use_cases::UseCases;
