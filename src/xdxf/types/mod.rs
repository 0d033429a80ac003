//! Foundational data structures and error types.

pub mod element;
pub mod error;
pub mod models;
