//! Request and response types flowing through the interception layer
//!
//! Both types are fully materialized (headers plus a `Bytes` body) so a
//! response can be served to the caller and written to the store without
//! re-reading the wire.

pub mod headers;
pub mod request;
pub mod response;

pub use headers::CacheControl;
pub use request::{CacheRequest, RequestCacheMode};
pub use response::CacheResponse;
