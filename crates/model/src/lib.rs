pub mod core;
pub mod error;
pub mod meta;

pub use error::{ModelError, Result};
