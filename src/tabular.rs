//! Reading and writing of tabular (CSV/TSV) long-format data, one
//! (taxon, character, state) triple per row.

use csv::{ReaderBuilder, WriterBuilder};

use crate::binarize::ASCERTAINMENT_SUFFIX;
use crate::error::{ParseError, Result};
use crate::model::PhyloData;
use crate::slug::{slug, SlugLevel};

/// Default output header for the taxa column
const DEFAULT_TAXA_COLUMN: &str = "Taxon";

/// Default output header for the character column
const DEFAULT_CHARACTER_COLUMN: &str = "Character";

/// Default output header for the state column
const DEFAULT_STATE_COLUMN: &str = "State";

/// Candidate substrings for inferring the taxa column
const TAXA_CANDIDATES: &[&str] = &[
    "taxon",
    "species",
    "language",
    "doculect",
    "manuscript",
    "witness",
];

/// Candidate substrings for inferring the character column
const CHARACTER_CANDIDATES: &[&str] = &["character", "feature", "property", "position"];

/// Candidate substrings for inferring the state column
const STATE_CANDIDATES: &[&str] = &[
    "state",
    "value",
    "observation",
    "cognate",
    "lesson",
    "reading",
];

/// Overrides for the three column names used in tabular sources and
/// outputs. Unset entries are inferred on input and fall back to the
/// `Taxon`/`Character`/`State` defaults on output.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub taxa: Option<String>,
    pub characters: Option<String>,
    pub states: Option<String>,
}

/// Detects the delimiter of a tabular source by comparing comma and tab
/// frequencies in its first line; commas win ties.
#[must_use]
pub fn detect_delimiter(source: &str) -> u8 {
    let header = source.lines().next().unwrap_or("");
    let commas = header.matches(',').count();
    let tabs = header.matches('\t').count();
    tracing::debug!(commas, tabs, "detecting tabular delimiter");

    if commas >= tabs {
        b','
    } else {
        b'\t'
    }
}

/// Finds the first header whose full slug contains one of the candidate
/// substrings, in candidate order
fn infer_column<'a>(headers: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    for candidate in candidates {
        for header in headers {
            if slug(header, SlugLevel::Full).contains(candidate) {
                return Some(header);
            }
        }
    }
    None
}

/// Resolves the three column names against the source headers, either
/// from the provided overrides or by candidate inference, and checks
/// they are distinct
fn resolve_columns(headers: &[String], columns: &ColumnSpec) -> Result<(String, String, String)> {
    let taxa = match &columns.taxa {
        Some(name) => name.clone(),
        None => infer_column(headers, TAXA_CANDIDATES)
            .ok_or(ParseError::UnresolvedColumn("taxa"))?
            .to_string(),
    };
    let characters = match &columns.characters {
        Some(name) => name.clone(),
        None => infer_column(headers, CHARACTER_CANDIDATES)
            .ok_or(ParseError::UnresolvedColumn("character"))?
            .to_string(),
    };
    let states = match &columns.states {
        Some(name) => name.clone(),
        None => infer_column(headers, STATE_CANDIDATES)
            .ok_or(ParseError::UnresolvedColumn("state"))?
            .to_string(),
    };

    if taxa == characters || taxa == states || characters == states {
        return Err(ParseError::NonUniqueColumns(format!("{taxa}, {characters}, {states}")).into());
    }
    tracing::debug!(%taxa, %characters, %states, "resolved tabular columns");

    Ok((taxa, characters, states))
}

/// Index of a resolved column name in the header record
fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| ParseError::MalformedRow(format!("no column named `{name}`")).into())
}

/// Parses a tabular source into the internal representation.
///
/// # Arguments
/// * `source` - The tabular text to parse.
/// * `delimiter` - The field delimiter, usually from [`detect_delimiter`].
/// * `columns` - Column name overrides; unset names are inferred.
pub fn read_data_tabular(source: &str, delimiter: u8, columns: &ColumnSpec) -> Result<PhyloData> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(source.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let (taxa, characters, states) = resolve_columns(&headers, columns)?;
    let taxa_idx = column_index(&headers, &taxa)?;
    let char_idx = column_index(&headers, &characters)?;
    let state_idx = column_index(&headers, &states)?;

    let mut phyd = PhyloData::new();
    for record in reader.records() {
        let record = record?;
        let row = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| ParseError::MalformedRow(format!("{record:?}")))
        };

        let state = row(state_idx)?;
        if state.is_empty() {
            continue;
        }
        phyd.extend(row(taxa_idx)?, row(char_idx)?, None, state);
    }

    Ok(phyd)
}

/// Output ordering key for a character name: within a binarized group,
/// the ascertainment column sorts before the per-state columns
fn output_key(char_id: &str) -> (String, u8) {
    char_id.strip_suffix(ASCERTAINMENT_SUFFIX).map_or_else(
        || (char_id.to_string(), 1),
        |base| (format!("{base}_"), 0),
    )
}

/// Builds a tabular representation: a header row followed by one row per
/// observed (taxon, character, state) triple, so polymorphic observations
/// yield multiple rows.
pub fn build_tabular(phyd: &PhyloData, delimiter: u8, columns: &ColumnSpec) -> Result<String> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(vec![]);
    writer.write_record([
        columns.taxa.as_deref().unwrap_or(DEFAULT_TAXA_COLUMN),
        columns
            .characters
            .as_deref()
            .unwrap_or(DEFAULT_CHARACTER_COLUMN),
        columns.states.as_deref().unwrap_or(DEFAULT_STATE_COLUMN),
    ])?;

    let mut char_ids: Vec<&str> = phyd.characters().map(|(id, _)| id).collect();
    char_ids.sort_by_key(|id| output_key(id));

    for char_id in char_ids {
        for taxon in phyd.taxa() {
            let Some(obs) = phyd.observation(taxon, char_id) else {
                continue;
            };
            for state in obs {
                writer.write_record([taxon, char_id, state.as_str()])?;
            }
        }
    }

    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    String::from_utf8(bytes)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarize::{binarize, Ascertainment};

    const SOURCE: &str = "Language,Feature,Value
L01,color,red
L01,shape,round
L02,color,blue
L02,color,green
L02,shape,
";

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(detect_delimiter("a\tb\tc\n"), b'\t');
        // commas win ties, including the empty header
        assert_eq!(detect_delimiter("a\n"), b',');
        assert_eq!(detect_delimiter("a,b\tc,d\te\tf\n"), b'\t');
    }

    #[test]
    fn test_read_data_tabular_with_inference() {
        let phyd = read_data_tabular(SOURCE, b',', &ColumnSpec::default()).unwrap();
        assert_eq!(phyd.num_taxa(), 2);
        assert_eq!(phyd.num_characters(), 2);
        assert_eq!(
            phyd.observation("L02", "color").unwrap().iter().collect::<Vec<_>>(),
            vec!["blue", "green"]
        );
        // the empty state cell is skipped
        assert!(phyd.observation("L02", "shape").is_none());
    }

    #[test]
    fn test_read_data_tabular_with_overrides() {
        let source = "id,trait,obs\nt1,c1,x\n";
        let columns = ColumnSpec {
            taxa: Some("id".to_string()),
            characters: Some("trait".to_string()),
            states: Some("obs".to_string()),
        };
        let phyd = read_data_tabular(source, b',', &columns).unwrap();
        assert!(phyd.observation("t1", "c1").is_some());
    }

    #[test]
    fn test_unresolvable_and_non_unique_columns() {
        assert!(read_data_tabular("a,b,c\n1,2,3\n", b',', &ColumnSpec::default()).is_err());

        let columns = ColumnSpec {
            taxa: Some("Language".to_string()),
            characters: Some("Language".to_string()),
            states: Some("Value".to_string()),
        };
        assert!(read_data_tabular(SOURCE, b',', &columns).is_err());
    }

    #[test]
    fn test_build_tabular() {
        let phyd = read_data_tabular(SOURCE, b',', &ColumnSpec::default()).unwrap();
        let output = build_tabular(&phyd, b',', &ColumnSpec::default()).unwrap();
        assert_eq!(
            output,
            "Taxon,Character,State\n\
             L01,color,red\n\
             L02,color,blue\n\
             L02,color,green\n\
             L01,shape,round\n"
        );
    }

    #[test]
    fn test_build_tabular_ascertainment_first() {
        let phyd = read_data_tabular(SOURCE, b',', &ColumnSpec::default()).unwrap();
        let binarized = binarize(&phyd, Ascertainment::True);
        let output = build_tabular(&binarized, b'\t', &ColumnSpec::default()).unwrap();

        let characters: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|line| line.split('\t').nth(1).unwrap())
            .collect();
        let first_color = characters.iter().position(|c| c.starts_with("color")).unwrap();
        assert_eq!(characters[first_color], "color_ASCERTAINMENT");
        let first_shape = characters.iter().position(|c| c.starts_with("shape")).unwrap();
        assert_eq!(characters[first_shape], "shape_ASCERTAINMENT");
    }

    #[test]
    fn test_tabular_round_trip() {
        let phyd = read_data_tabular(SOURCE, b',', &ColumnSpec::default()).unwrap();
        let output = build_tabular(&phyd, b',', &ColumnSpec::default()).unwrap();
        let reparsed = read_data_tabular(&output, b',', &ColumnSpec::default()).unwrap();
        assert_eq!(
            build_tabular(&reparsed, b',', &ColumnSpec::default()).unwrap(),
            output
        );
    }
}
