//! Text-format sniffing and re-encoding.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use encoding_rs::Encoding;

use crate::context::FileContext;

/// Read buffer size for line scans.
const LINE_BUFFER_SIZE: usize = 8192;

/// Number of leading lines `is_html` looks at.
const HTML_SNIFF_LINES: usize = 6;

/// Whether the file holds only 7-bit ASCII.
///
/// Unopenable files are not ASCII; empty files are.
pub fn is_ascii(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("Cannot open {}: {}", path.display(), e);
            return false;
        }
    };

    let mut reader = BufReader::with_capacity(LINE_BUFFER_SIZE, file);
    let mut line = Vec::with_capacity(LINE_BUFFER_SIZE);

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return true,
            Ok(_) if !line.is_ascii() => return false,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// A line looks like HTML when it opens a tag, closing tag, comment or
/// processing instruction.
fn looks_like_html(line: &[u8]) -> bool {
    line.windows(2).any(|pair| {
        pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || matches!(pair[1], b'/' | b'!' | b'?'))
    })
}

/// Sniff the first lines of a file.
///
/// NOTE: the polarity is inverted relative to the name. This returns true as
/// soon as one of the first six lines does NOT look like HTML, and false
/// when every inspected line does (or the file is empty or unopenable).
/// Probably a latent defect, but the intended polarity is unconfirmed.
///
/// An empty file returns false on purpose: an empty first read does not
/// count as a line that fails the HTML check.
pub fn is_html(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("Cannot open {}: {}", path.display(), e);
            return false;
        }
    };

    let mut reader = BufReader::with_capacity(LINE_BUFFER_SIZE, file);
    let mut line = Vec::new();

    for _ in 0..HTML_SNIFF_LINES {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if !looks_like_html(&line) => return true,
            Ok(_) => {}
        }
    }

    false
}

impl FileContext {
    /// Recode a file in place from the legacy encoding to UTF-8.
    ///
    /// Returns false if the encoding label is unknown, the file cannot be
    /// read, the contents are not valid in the legacy encoding, or the
    /// rewrite fails. The original bytes are not kept.
    pub fn to_utf8(&self, path: &Path) -> bool {
        let label = &self.config.text.legacy_encoding;
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            tracing::warn!("Unknown legacy encoding '{}'", label);
            return false;
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                return false;
            }
        };

        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
        if had_errors {
            tracing::warn!(
                "{} is not valid {}, leaving it untouched",
                path.display(),
                encoding.name()
            );
            return false;
        }

        match fs::write(path, text.as_bytes()) {
            Ok(()) => {
                tracing::debug!("Recoded {} from {} to UTF-8", path.display(), encoding.name());
                true
            }
            Err(e) => {
                tracing::warn!("Cannot rewrite {}: {}", path.display(), e);
                false
            }
        }
    }
}
