//! Transparent input/output streams and character encoding handling.
//!
//! `-` stands for stdin on the input side and stdout on the output side.

use std::io::{Read, Write};

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::error::{OptionsError, Result};

/// Decodes raw bytes into a string, either with an explicitly labelled
/// encoding (any WHATWG label, e.g. `utf-8`, `latin1`) or with `auto`
/// detection.
pub fn decode(bytes: &[u8], encoding: &str) -> Result<String> {
    let encoding = if encoding.eq_ignore_ascii_case("auto") {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let guessed = detector.guess(None, true);
        tracing::debug!(encoding = guessed.name(), "detected input encoding");
        guessed
    } else {
        Encoding::for_label(encoding.as_bytes())
            .ok_or_else(|| OptionsError::UnknownEncoding(encoding.to_string()))?
    };

    let (text, _, _) = encoding.decode(bytes);
    Ok(text.into_owned())
}

/// Reads and decodes the source, from a file or from stdin when the name
/// is `-`.
///
/// # Arguments
/// * `input` - The input filename, or `-` for stdin.
/// * `encoding` - An encoding label, or `auto` for detection.
pub fn fetch_source(input: &str, encoding: &str) -> Result<String> {
    let bytes = if input == "-" {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        tracing::debug!(input, "reading source file");
        std::fs::read(input)?
    };

    decode(&bytes, encoding)
}

/// Writes the converted output, to a file or to stdout when the name
/// is `-`
pub fn write_output(output: &str, content: &str) -> Result<()> {
    if output == "-" {
        std::io::stdout().write_all(content.as_bytes())?;
    } else {
        tracing::debug!(output, "writing output file");
        std::fs::write(output, content)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_explicit_label() {
        // "état" in ISO-8859-1
        let bytes = b"\xe9tat";
        assert_eq!(decode(bytes, "latin1").unwrap(), "état");
        assert_eq!(decode(bytes, "ISO-8859-1").unwrap(), "état");
    }

    #[test]
    fn test_decode_auto() {
        assert_eq!(decode("état".as_bytes(), "auto").unwrap(), "état");
        assert_eq!(decode(b"plain ascii\n", "auto").unwrap(), "plain ascii\n");
        // non-UTF-8 bytes fall back to a detected legacy encoding
        assert_eq!(decode(b"\xe9tat", "auto").unwrap(), "état");
    }

    #[test]
    fn test_decode_unknown_label() {
        assert!(decode(b"abc", "no-such-encoding").is_err());
    }
}
