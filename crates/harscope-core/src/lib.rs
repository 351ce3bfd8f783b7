pub mod analysis;
pub mod error;
pub mod format;
pub mod har;

pub use error::{Error, Result};
