//! Repository implementations for database operations

pub mod history;
pub mod settings;

pub use history::*;
pub use settings::*;
