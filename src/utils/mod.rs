//! Utility functions for code encoding and URL processing.
//!
//! - [`base62`] - Integer to short code encoding
//! - [`url_normalizer`] - URL validation and canonicalization

pub mod base62;
pub mod url_normalizer;
