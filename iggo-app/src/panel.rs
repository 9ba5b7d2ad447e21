pub mod data;
pub mod style;
pub mod view;
