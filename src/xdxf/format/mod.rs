//! # XDXF markup processing
//!
//! Pure functions over completed element trees. The streaming reader owns
//! I/O; everything here works on one article (or one metadata block) at a
//! time.
//!
//! - `abbreviations`: builds the abbreviation lookup table.
//! - `entities`: collects entities declared in the DOCTYPE.
//! - `titles`: expands title elements into lookup keys.
//! - `transform`: rewrites article markup into HTML.
//! - `serialize`: renders element trees as markup bytes.

pub mod abbreviations;
pub mod entities;
pub mod serialize;
pub mod titles;
pub mod transform;
