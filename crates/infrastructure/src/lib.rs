pub mod cache;
pub mod clock;
pub mod database;
pub mod image;
pub mod providers;
