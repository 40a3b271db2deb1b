pub mod editors;
pub mod host;
pub mod stores;
