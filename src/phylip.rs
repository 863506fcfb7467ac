//! Reading and writing of non-interleaved PHYLIP alignments.

use crate::error::{ParseError, Result};
use crate::model::PhyloData;
use crate::utils::positional_character;

/// Parses a PHYLIP source into the internal representation.
///
/// Expects a header line carrying the number of taxa and of characters,
/// followed by one `<taxon> <vector>` row per taxon. Vectors are uppercased
/// and may carry internal spacing. Characters receive positional names
/// (`CHAR_0`, `CHAR_1`, ...), zero-padded to the decimal width of the
/// character count; gap cells contribute no observation.
///
/// # Arguments
/// * `source` - The PHYLIP text to parse.
pub fn read_data_phylip(source: &str) -> Result<PhyloData> {
    let mut lines = source.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().ok_or(ParseError::MissingPhylipHeader)?;
    let mut fields = header.split_whitespace();
    let (ntax, nchar): (usize, usize) = match (fields.next(), fields.next()) {
        (Some(ntax), Some(nchar)) => (
            ntax.parse().map_err(|_| ParseError::MissingPhylipHeader)?,
            nchar.parse().map_err(|_| ParseError::MissingPhylipHeader)?,
        ),
        _ => return Err(ParseError::MissingPhylipHeader.into()),
    };
    tracing::debug!(ntax, nchar, "parsed alignment header");

    let mut rows: Vec<(String, String)> = Vec::new();
    for line in lines {
        let row = line.trim();
        let (taxon, alignment) = row
            .split_once(char::is_whitespace)
            .ok_or_else(|| ParseError::MalformedRow(row.to_string()))?;
        let vector: String = alignment
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        rows.push((taxon.to_string(), vector));
    }

    if rows.len() != ntax {
        return Err(ParseError::TaxaCountMismatch {
            expected: ntax,
            got: rows.len(),
        }
        .into());
    }
    let lengths: Vec<usize> = rows.iter().map(|(_, vector)| vector.len()).collect();
    if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(ParseError::UnevenVectors.into());
    }
    if let Some(&length) = lengths.first() {
        if length != nchar {
            return Err(ParseError::VectorLengthMismatch {
                expected: nchar,
                got: length,
            }
            .into());
        }
    }

    let mut phyd = PhyloData::new();
    for (taxon, vector) in &rows {
        for (idx, state) in vector.chars().enumerate() {
            if state != '-' {
                phyd.extend(
                    taxon,
                    &positional_character(idx, nchar),
                    None,
                    &state.to_string(),
                );
            }
        }
    }

    Ok(phyd)
}

/// Builds a PHYLIP representation: a `<ntax> <nchar>` header followed by
/// the matrix rows, with taxon labels left-padded to the longest label.
#[must_use]
pub fn build_phylip(phyd: &PhyloData) -> String {
    let matrix = phyd.matrix();
    let taxon_length = matrix.iter().map(|(taxon, _)| taxon.len()).max().unwrap_or(0);

    let rows: Vec<String> = matrix
        .iter()
        .map(|(taxon, vector)| format!("{taxon:<taxon_length$}    {vector}"))
        .collect();

    format!(
        "{} {}\n{}\n",
        phyd.num_taxa(),
        phyd.num_characters(),
        rows.join("\n"),
    )
}
