//! Core XDXF reading module

pub mod format;
pub mod sink;
pub mod types;
pub mod utils;
mod reader;

use std::io::BufRead;

pub use reader::XdxfReader;
pub use types::error::{Result, XdxfError};
pub use types::models::ConvertOptions;

impl XdxfReader<Box<dyn BufRead>> {
    /// Opens a dictionary by path (`-` for stdin) and creates a reader for it.
    pub fn open(path: &str, options: ConvertOptions) -> Result<Self> {
        let input = utils::open_input(path)?;
        Ok(Self::new(input, options))
    }
}
