//! Input opening and small string helpers.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info};

use super::types::error::{Result, XdxfError};

/// Member picked out of dictionary archives.
pub const ARCHIVE_MEMBER: &str = "dict.xdxf";

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const TAR_MAGIC: &[u8] = b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_BLOCK_SIZE: u64 = 512;

/// Opens the input stream for a dictionary.
///
/// `-` reads from stdin. A leading `~/` is resolved against `$HOME`.
/// Gzip-compressed files are decompressed on the fly. A tar archive (plain
/// or gzipped) must contain a member named `dict.xdxf`, which becomes the
/// input; any other file is read as the document itself.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        info!("Reading XDXF from stdin");
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let path = expand_home(path);
    info!("Opening XDXF file: {}", path.display());
    let (head, file) = peek(File::open(&path)?)?;
    let compressed = head.starts_with(GZIP_MAGIC);
    let raw = Cursor::new(head).chain(file);
    if compressed {
        debug!("{} is gzip compressed", path.display());
        open_stream(&path, GzDecoder::new(raw))
    } else {
        open_stream(&path, raw)
    }
}

fn open_stream<R: Read + 'static>(path: &Path, input: R) -> Result<Box<dyn BufRead>> {
    let (head, input) = peek(input)?;
    let is_tar = head.get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()) == Some(TAR_MAGIC);
    let stream = Cursor::new(head).chain(input);
    if is_tar {
        extract_dictionary(path, stream)
    } else {
        Ok(Box::new(BufReader::new(stream)))
    }
}

/// Reads the `dict.xdxf` member of a tar archive into memory.
fn extract_dictionary<R: Read>(path: &Path, input: R) -> Result<Box<dyn BufRead>> {
    let mut archive = tar::Archive::new(input);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_dictionary = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == OsStr::new(ARCHIVE_MEMBER));
        if !is_dictionary {
            continue;
        }
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        info!(
            "Extracted {} from archive ({} bytes)",
            ARCHIVE_MEMBER,
            data.len()
        );
        return Ok(Box::new(Cursor::new(data)));
    }
    Err(XdxfError::InvalidFormat(format!(
        "{} doesn't look like a XDXF dictionary",
        path.display()
    )))
}

/// Reads up to one tar block from the front of `input` for format sniffing.
fn peek<R: Read>(mut input: R) -> io::Result<(Vec<u8>, R)> {
    let mut head = Vec::with_capacity(TAR_BLOCK_SIZE as usize);
    input.by_ref().take(TAR_BLOCK_SIZE).read_to_end(&mut head)?;
    Ok((head, input))
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// Base name of the input, used as the `source` tag.
pub fn source_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Percent-encodes every byte of the UTF-8 text outside `A-Z a-z 0-9 - _ . ~`.
pub fn encode_uri_component(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}
