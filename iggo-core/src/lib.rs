pub mod config;
pub mod error;
pub mod record;
pub mod storage;
pub mod store;
pub mod visibility;
