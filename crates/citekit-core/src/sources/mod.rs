//! Metadata sources

pub mod crossref;
pub mod traits;

pub use crossref::*;
pub use traits::*;
