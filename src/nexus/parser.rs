//! Character-by-character NEXUS parser.
//!
//! Parsing is done with a manually coded automaton that keeps track of
//! state and buffers content until a full statement is available. It does
//! not aim at full NEXUS grammar coverage (no comments, no interleaved
//! matrices), but covers the commands needed for character-matrix
//! conversion and can be extended gradually.

use std::collections::BTreeMap;

use crate::error::{ParseError, Result};
use crate::model::{PhyloData, SYMBOL_ALPHABET};
use crate::utils::positional_character;

/// Automaton states: expecting the `#NEXUS` header, expecting a
/// `BEGIN <name>;` declaration, or accumulating statements inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Preamble,
    OutOfBlock,
    InBlock,
}

/// A named 1-based inclusive column range declared by a `CHARSET` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetRange {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// The structured content of a NEXUS source, with fields nullable where
/// the corresponding command or subcommand was absent.
#[derive(Debug, Clone, Default)]
pub struct NexusData {
    /// Declared number of taxa (`DIMENSIONS NTAX=`)
    pub ntax: Option<usize>,
    /// Declared number of characters (`DIMENSIONS NCHAR=`)
    pub nchar: Option<usize>,
    /// Declared datatype (`FORMAT DATATYPE=`), uppercased
    pub datatype: Option<String>,
    /// Symbol representing missing data (`FORMAT MISSING=`)
    pub missing: Option<char>,
    /// Symbol representing gaps (`FORMAT GAP=`)
    pub gap: Option<char>,
    /// Declared state symbols (`FORMAT SYMBOLS="..."`), spaces removed
    pub symbols: Option<String>,
    /// Character labels by 1-based column index (`CHARSTATELABELS`)
    pub charstate_labels: BTreeMap<usize, String>,
    /// Explicit named states per character label (`CHARSTATELABELS` with
    /// slash notation)
    pub charstate_states: BTreeMap<String, Vec<String>>,
    /// Alignment rows as (taxon, vector) pairs, in file order
    pub matrix: Vec<(String, String)>,
    /// Declared charset ranges, in file order
    pub charsets: Vec<CharsetRange>,
}

/// Parses the information in a NEXUS string into a [`NexusData`] record.
///
/// Fails when the first non-whitespace content is not `#NEXUS` or when a
/// statement outside a block is not a `BEGIN <name>;` declaration.
/// Unrecognized statements inside a block are tolerated and ignored.
pub fn parse_nexus(source: &str) -> Result<NexusData> {
    let mut data = NexusData::default();
    let mut buffer = String::new();
    let mut state = ParserState::Preamble;

    for (idx, ch) in source.char_indices() {
        buffer.push(ch);

        match state {
            ParserState::Preamble => {
                let head = buffer.trim();
                if head == "#NEXUS" {
                    buffer.clear();
                    state = ParserState::OutOfBlock;
                } else if !head.is_empty() && !"#NEXUS".starts_with(head) {
                    return Err(ParseError::MissingNexusHeader.into());
                }
            }
            ParserState::OutOfBlock => {
                if ch == ';' {
                    parse_begin(&buffer, idx)?;
                    buffer.clear();
                    state = ParserState::InBlock;
                }
            }
            ParserState::InBlock => {
                if ch == ';' {
                    let compact: String = buffer.chars().filter(|c| !c.is_whitespace()).collect();
                    if compact.eq_ignore_ascii_case("END;") {
                        state = ParserState::OutOfBlock;
                    } else {
                        dispatch_statement(buffer.trim(), &mut data)?;
                    }
                    buffer.clear();
                }
            }
        }
    }

    if state == ParserState::Preamble {
        return Err(ParseError::MissingNexusHeader.into());
    }

    Ok(data)
}

/// Validates a `BEGIN <name>;` declaration and returns the block name
fn parse_begin(buffer: &str, pos: usize) -> Result<String> {
    let stmt = buffer.trim();
    let stmt = stmt.strip_suffix(';').unwrap_or(stmt).trim_end();

    match stmt.split_once(|c: char| c.is_whitespace()) {
        Some((keyword, name)) if keyword.eq_ignore_ascii_case("BEGIN") && !name.trim().is_empty() => {
            Ok(name.trim().to_uppercase())
        }
        _ => Err(ParseError::MalformedBlock(pos).into()),
    }
}

/// Classifies a statement by its leading keyword and parses it into `data`
fn dispatch_statement(stmt: &str, data: &mut NexusData) -> Result<()> {
    let Some(keyword) = stmt.split_whitespace().next() else {
        return Ok(());
    };

    match keyword.to_ascii_uppercase().as_str() {
        "DIMENSIONS" => parse_dimensions(stmt, data),
        "FORMAT" => parse_format(stmt, data),
        "CHARSTATELABELS" => parse_charstatelabels(stmt, data),
        "MATRIX" => parse_matrix(stmt, data),
        "CHARSET" => parse_charset(stmt, data),
        other => {
            tracing::debug!(statement = other, "ignoring unrecognized NEXUS statement");
            Ok(())
        }
    }
}

fn parse_dimensions(stmt: &str, data: &mut NexusData) -> Result<()> {
    if let Some(value) = keyword_value(stmt, "NTAX") {
        data.ntax = leading_integer(value);
    }
    if let Some(value) = keyword_value(stmt, "NCHAR") {
        data.nchar = leading_integer(value);
    }
    Ok(())
}

fn parse_format(stmt: &str, data: &mut NexusData) -> Result<()> {
    if let Some(value) = keyword_value(stmt, "DATATYPE") {
        data.datatype = leading_word(value).map(|w| w.to_ascii_uppercase());
    }
    if let Some(value) = keyword_value(stmt, "MISSING") {
        data.missing = value.chars().next();
    }
    if let Some(value) = keyword_value(stmt, "GAP") {
        data.gap = value.chars().next();
    }
    if let Some(value) = keyword_value(stmt, "SYMBOLS") {
        data.symbols = quoted_content(value).map(|s| s.replace(' ', ""));
    }
    Ok(())
}

fn parse_charstatelabels(stmt: &str, data: &mut NexusData) -> Result<()> {
    let body = statement_body(stmt);

    for entry in body.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        if let Some((head, tail)) = entry.split_once('/') {
            let mut parts = head.split_whitespace();
            let (Some(index), Some(label)) = (parts.next(), parts.next()) else {
                return Err(ParseError::MalformedStatement(entry.to_string()).into());
            };
            let index: usize = index
                .parse()
                .map_err(|_| ParseError::MalformedStatement(entry.to_string()))?;
            let states: Vec<String> = tail.split_whitespace().map(String::from).collect();

            data.charstate_labels.insert(index, label.to_string());
            data.charstate_states.insert(label.to_string(), states);
        } else {
            let mut parts = entry.split_whitespace();
            let (Some(index), Some(label)) = (parts.next(), parts.next()) else {
                return Err(ParseError::MalformedStatement(entry.to_string()).into());
            };
            let index: usize = index
                .parse()
                .map_err(|_| ParseError::MalformedStatement(entry.to_string()))?;
            data.charstate_labels.insert(index, label.to_string());
        }
    }

    Ok(())
}

fn parse_matrix(stmt: &str, data: &mut NexusData) -> Result<()> {
    let body = statement_body(stmt);

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((taxon, vector)) = line.split_once(|c: char| c.is_whitespace()) else {
            return Err(ParseError::MalformedRow(line.to_string()).into());
        };
        let vector: String = vector.chars().filter(|c| !c.is_whitespace()).collect();
        data.matrix.push((taxon.to_string(), vector));
    }

    Ok(())
}

fn parse_charset(stmt: &str, data: &mut NexusData) -> Result<()> {
    // Only the `charset <name> = <start>-<end>` syntax is supported;
    // anything else is skipped, not an error.
    let body = statement_body(stmt);
    let Some((left, right)) = body.split_once('=') else {
        tracing::debug!(statement = body, "skipping unsupported CHARSET syntax");
        return Ok(());
    };

    let name = left.split_whitespace().next();
    let range = right
        .trim()
        .split_once('-')
        .and_then(|(start, end)| {
            let start: usize = start.trim().parse().ok()?;
            let end: usize = end.trim().parse().ok()?;
            Some((start, end))
        });

    match (name, range) {
        (Some(name), Some((start, end))) => {
            data.charsets.push(CharsetRange {
                name: name.to_string(),
                start,
                end,
            });
        }
        _ => tracing::debug!(statement = body, "skipping unsupported CHARSET syntax"),
    }

    Ok(())
}

/// Strips the leading keyword and the terminating `;` from a statement
fn statement_body(stmt: &str) -> &str {
    let body = stmt
        .split_once(|c: char| c.is_whitespace())
        .map_or("", |(_, rest)| rest);
    body.strip_suffix(';').unwrap_or(body).trim()
}

/// Finds `<key> = <value>` in a statement, matching the key
/// case-insensitively as a standalone word, and returns the raw remainder
/// starting right after the `=`
fn keyword_value<'a>(stmt: &'a str, key: &str) -> Option<&'a str> {
    let upper = stmt.to_ascii_uppercase();
    let mut search = 0;

    while let Some(offset) = upper[search..].find(key) {
        let at = search + offset;
        let standalone = at == 0 || !upper.as_bytes()[at - 1].is_ascii_alphanumeric();
        let rest = stmt[at + key.len()..].trim_start();
        if standalone {
            if let Some(rest) = rest.strip_prefix('=') {
                return Some(rest.trim_start());
            }
        }
        search = at + key.len();
    }

    None
}

/// Parses the leading decimal digits of a value, if any
fn leading_integer(value: &str) -> Option<usize> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Takes the leading alphanumeric word of a value, if any
fn leading_word(value: &str) -> Option<&str> {
    let end = value
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(value.len());
    (end > 0).then(|| &value[..end])
}

/// Extracts the content of a double-quoted value, if quoted
fn quoted_content(value: &str) -> Option<&str> {
    let rest = value.strip_prefix('"')?;
    rest.find('"').map(|end| &rest[..end])
}

/// Splits a matrix vector into its cells, each carrying one symbol or,
/// for `(..)`/`{..}` polymorphic groups, several
fn matrix_cells(vector: &str) -> Vec<Vec<char>> {
    let mut cells = Vec::new();
    let mut chars = vector.chars();

    while let Some(symbol) = chars.next() {
        if symbol == '(' || symbol == '{' {
            let closer = if symbol == '(' { ')' } else { '}' };
            let mut group = Vec::new();
            for inner in chars.by_ref() {
                if inner == closer {
                    break;
                }
                if inner != ',' && !inner.is_whitespace() {
                    group.push(inner);
                }
            }
            cells.push(group);
        } else {
            cells.push(vec![symbol]);
        }
    }

    cells
}

/// Parses a NEXUS source directly into the internal representation.
///
/// When `CHARSET` ranges were declared, raw matrix columns are grouped into
/// characters by that grouping: the column's charstate label (or positional
/// name) becomes the observed token, `0` encodes absence and is skipped.
/// Otherwise each column is its own character, with symbols resolved
/// through the declared `/state` lists where available, or taken literally
/// for genetic and binary data. Polymorphic cells contribute one token per
/// grouped symbol.
pub fn read_data_nexus(source: &str) -> Result<PhyloData> {
    let nexus = parse_nexus(source)?;

    let missing = nexus.missing.unwrap_or('?');
    let gap = nexus.gap.unwrap_or('-');
    let alphabet = nexus.symbols.as_deref().unwrap_or(SYMBOL_ALPHABET);

    let mut phyd = PhyloData::new();

    if nexus.charsets.is_empty() {
        for (taxon, vector) in &nexus.matrix {
            let cells = matrix_cells(vector);
            let nchar = nexus.nchar.unwrap_or(cells.len());
            for (pos, cell) in cells.iter().enumerate() {
                let character = nexus
                    .charstate_labels
                    .get(&(pos + 1))
                    .cloned()
                    .unwrap_or_else(|| positional_character(pos, nchar));

                for &symbol in cell {
                    if symbol == missing {
                        phyd.extend(taxon, &character, None, "?");
                    } else if symbol == gap {
                        // No observation recorded for gaps
                    } else {
                        let token = nexus
                            .charstate_states
                            .get(&character)
                            .and_then(|states| {
                                alphabet.find(symbol).and_then(|k| states.get(k)).cloned()
                            })
                            .unwrap_or_else(|| symbol.to_string());
                        phyd.extend(taxon, &character, None, &token);
                    }
                }
            }
        }
    } else {
        let mut column_charset: BTreeMap<usize, &str> = BTreeMap::new();
        for charset in &nexus.charsets {
            for idx in charset.start..=charset.end {
                column_charset.insert(idx, &charset.name);
            }
        }

        for (taxon, vector) in &nexus.matrix {
            let cells = matrix_cells(vector);
            let nchar = nexus.nchar.unwrap_or(cells.len());
            for (pos, cell) in cells.iter().enumerate() {
                let Some(charset) = column_charset.get(&(pos + 1)) else {
                    tracing::debug!(column = pos + 1, "column outside any declared charset");
                    continue;
                };

                for &symbol in cell {
                    if symbol == missing {
                        phyd.extend(taxon, charset, None, "?");
                    } else if symbol == gap || symbol == '0' {
                        // Gaps carry no observation; '0' encodes absence in
                        // the presence-coded grouping
                    } else {
                        let token = nexus
                            .charstate_labels
                            .get(&(pos + 1))
                            .cloned()
                            .unwrap_or_else(|| positional_character(pos, nchar));
                        phyd.extend(taxon, charset, None, &token);
                    }
                }
            }
        }
    }

    Ok(phyd)
}
