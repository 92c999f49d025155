//! Whole-file loading with charset detection

use crate::error::SourceError;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Raw input bytes plus the encoding label they will be decoded with
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    encoding: String,
}

impl RawDocument {
    /// Wrap bytes, detecting their encoding
    pub fn detect(bytes: Vec<u8>) -> Self {
        let encoding = detect_encoding(&bytes).name().to_string();
        Self { bytes, encoding }
    }

    /// Wrap bytes with an explicit encoding label
    ///
    /// The label is not checked until [`RawDocument::decode`].
    pub fn with_encoding(bytes: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            bytes,
            encoding: label.into(),
        }
    }

    /// Encoding label the document will be decoded with
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Decode the whole document into text
    ///
    /// Malformed sequences are replaced with U+FFFD and logged.
    pub fn decode(&self) -> Result<String, SourceError> {
        let encoding = Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| SourceError::EncodingUnknown(self.encoding.clone()))?;

        let (text, had_errors) = encoding.decode_with_bom_removal(&self.bytes);
        if had_errors {
            warn!(
                "Input contained byte sequences invalid for {}; replaced with U+FFFD",
                encoding.name()
            );
        }
        Ok(text.into_owned())
    }
}

/// Read a file once and detect its encoding
pub fn load(path: impl AsRef<Path>) -> Result<RawDocument, SourceError> {
    let bytes = read_bytes(path.as_ref())?;
    let document = RawDocument::detect(bytes);
    debug!(
        "Loaded {} bytes from {}, detected encoding {}",
        document.bytes.len(),
        path.as_ref().display(),
        document.encoding
    );
    Ok(document)
}

/// Read a file once, decoding it with a caller-supplied encoding label
pub fn load_with_encoding(
    path: impl AsRef<Path>,
    label: &str,
) -> Result<RawDocument, SourceError> {
    let bytes = read_bytes(path.as_ref())?;
    Ok(RawDocument::with_encoding(bytes, label))
}

/// Load and decode a file in one step
///
/// With `encoding = None` the charset is detected from the content.
pub fn read_text(path: impl AsRef<Path>, encoding: Option<&str>) -> Result<String, SourceError> {
    let document = match encoding {
        Some(label) => load_with_encoding(path, label)?,
        None => load(path)?,
    };
    document.decode()
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, SourceError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::Io(e),
    })
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}
