//! Cache-first interception
//!
//! The controller resolves every intercepted request through one ordered
//! chain: fresh store entry, preload, network, stale entry, offline
//! fallback, synthetic network error. A fresh hit also schedules a
//! background refresh so the next caller sees newer data.

pub mod controller;
pub mod refresh;
pub mod resolution;

pub use controller::{InterceptOptions, InterceptionController};
pub use resolution::Resolution;
