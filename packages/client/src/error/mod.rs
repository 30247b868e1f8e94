pub mod classification;
pub mod constructors;
pub mod types;

pub use constructors::*;
pub use types::{CacheError, NetworkErrorKind, Result, SeedFailure};
