//! Fluent configuration of a [`crate::ServiceCache`]
//!
//! - `core`: the builder and its `build` step
//! - `options`: chainable settings
//! - `request`: fluent construction of intercepted requests

pub mod core;
pub mod options;
pub mod request;

pub use self::core::ServiceCacheBuilder;
pub use request::RequestBuilder;
