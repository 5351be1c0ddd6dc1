pub mod get_stats;
pub mod sweep_expired;

pub use get_stats::GetCacheStatsUseCase;
pub use sweep_expired::SweepExpiredEntriesUseCase;
