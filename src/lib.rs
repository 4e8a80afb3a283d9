pub mod aircraft;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod section;
pub mod topology;

pub use error::{Result, WingcutError};
