pub mod memory_tier;
pub mod sqlite_tier;

pub use memory_tier::MemoryCacheTier;
pub use sqlite_tier::SqliteCacheTier;
