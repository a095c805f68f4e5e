//! Pure domain types with minimal dependencies
//!
//! Types here have no framework dependencies (cosmic, iced, etc.)
//! so they can be tested without a display.

pub mod geometry;
pub mod selection;

pub use geometry::*;
pub use selection::*;
