pub mod app;
pub mod local_storage;
pub mod panel;
pub mod tracing;
