//! Request parameter resolution
//!
//! Looks up each recognized parameter in a primary source (action inputs)
//! and a fallback source (process environment), then coerces and
//! validates the raw text into typed values.

mod resolve;
mod source;

pub use resolve::*;
pub use source::*;
