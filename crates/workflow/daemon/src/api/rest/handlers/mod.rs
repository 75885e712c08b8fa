//! API request handlers

mod definitions;
mod health;
mod instances;

pub use definitions::*;
pub use health::*;
pub use instances::*;
