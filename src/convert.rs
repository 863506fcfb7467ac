//! The conversion pipeline: read, slug, optionally binarize, write.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::binarize::{binarize, Ascertainment};
use crate::error::{Error, OptionsError, Result};
use crate::nexus::{build_nexus, read_data_nexus};
use crate::phylip::{build_phylip, read_data_phylip};
use crate::slug::SlugLevel;
use crate::tabular::{build_tabular, detect_delimiter, read_data_tabular, ColumnSpec};

/// A supported data format. `Tabular` stands for delimiter-detected
/// tabular input; on output it renders as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Tabular,
    Csv,
    Tsv,
    Nexus,
    Phylip,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tabular" => Ok(Self::Tabular),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "nexus" => Ok(Self::Nexus),
            "phylip" => Ok(Self::Phylip),
            other => Err(OptionsError::UnknownFormat(other.to_string()).into()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tabular => "tabular",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Nexus => "nexus",
            Self::Phylip => "phylip",
        };
        write!(f, "{label}")
    }
}

impl Format {
    /// Resolves an output format from a filename extension (`csv`, `tsv`,
    /// `nex`/`nexus`, `phy`/`phylip`). Errors for stdin/stdout (`-`) and
    /// unknown extensions, which carry no format information.
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(OptionsError::UndetectableFormat)?;

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "nex" | "nexus" => Ok(Self::Nexus),
            "phy" | "phylip" => Ok(Self::Phylip),
            _ => Err(OptionsError::UndetectableFormat.into()),
        }
    }
}

/// Options driving one conversion.
///
/// `from` set to `None` asks for content-based detection. Column specs
/// apply to tabular sources and outputs only.
#[derive(Debug, Clone)]
pub struct Options {
    pub from: Option<Format>,
    pub to: Format,
    pub input_columns: ColumnSpec,
    pub output_columns: ColumnSpec,
    pub slug_taxa: SlugLevel,
    pub slug_chars: SlugLevel,
    pub binarize: bool,
    pub ascertainment: Ascertainment,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            from: None,
            to: Format::Csv,
            input_columns: ColumnSpec::default(),
            output_columns: ColumnSpec::default(),
            slug_taxa: SlugLevel::default(),
            slug_chars: SlugLevel::default(),
            binarize: false,
            ascertainment: Ascertainment::default(),
        }
    }
}

/// Detects the input format from the content itself: a `#NEXUS` header,
/// a PHYLIP dimensions line, or tabular otherwise
fn detect_input_format(source: &str) -> Format {
    if source.trim_start().starts_with("#NEXUS") {
        return Format::Nexus;
    }

    let header = source.lines().find(|line| !line.trim().is_empty());
    if let Some(header) = header {
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() == 2 && fields.iter().all(|field| field.parse::<usize>().is_ok()) {
            return Format::Phylip;
        }
    }

    Format::Tabular
}

/// Converts a source between formats.
///
/// Reads the source per `options.from` (or content detection), slugs taxa
/// and character labels, optionally binarizes, and renders per
/// `options.to`. The whole pipeline is deterministic: identical inputs and
/// options produce byte-identical output.
///
/// # Arguments
/// * `source` - The decoded source text.
/// * `options` - The conversion options.
pub fn convert(source: &str, options: &Options) -> Result<String> {
    let from = options.from.unwrap_or_else(|| detect_input_format(source));
    tracing::info!(from = %from, to = %options.to, "converting");

    let mut phyd = match from {
        Format::Nexus => read_data_nexus(source)?,
        Format::Phylip => read_data_phylip(source)?,
        Format::Tabular => {
            read_data_tabular(source, detect_delimiter(source), &options.input_columns)?
        }
        Format::Csv => read_data_tabular(source, b',', &options.input_columns)?,
        Format::Tsv => read_data_tabular(source, b'\t', &options.input_columns)?,
    };

    phyd.slug_taxa(options.slug_taxa);
    phyd.slug_chars(options.slug_chars);

    if options.binarize {
        phyd = binarize(&phyd, options.ascertainment);
    }

    match options.to {
        Format::Nexus => Ok(build_nexus(&phyd)),
        Format::Phylip => Ok(build_phylip(&phyd)),
        Format::Tabular | Format::Csv => build_tabular(&phyd, b',', &options.output_columns),
        Format::Tsv => build_tabular(&phyd, b'\t', &options.output_columns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABULAR: &str = "Taxon,Character,State\nA,c1,red\nB,c1,blue\n";

    #[test]
    fn test_format_from_str() {
        assert_eq!("NEXUS".parse::<Format>().unwrap(), Format::Nexus);
        assert_eq!("csv".parse::<Format>().unwrap(), Format::Csv);
        assert!("newick".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("data.csv").unwrap(), Format::Csv);
        assert_eq!(Format::from_path("out/data.nex").unwrap(), Format::Nexus);
        assert_eq!(Format::from_path("data.PHY").unwrap(), Format::Phylip);
        assert!(Format::from_path("-").is_err());
        assert!(Format::from_path("data.txt").is_err());
    }

    #[test]
    fn test_detect_input_format() {
        assert_eq!(detect_input_format("  \n#NEXUS\n"), Format::Nexus);
        assert_eq!(detect_input_format("3 4\nL01    ACGT\n"), Format::Phylip);
        assert_eq!(detect_input_format(TABULAR), Format::Tabular);
    }

    #[test]
    fn test_convert_tabular_to_nexus() {
        let options = Options {
            to: Format::Nexus,
            ..Options::default()
        };
        let nexus = convert(TABULAR, &options).unwrap();
        assert!(nexus.starts_with("#NEXUS\n"));
        assert!(nexus.contains("DIMENSIONS NTAX=2;"));
        assert!(nexus.contains("1 c1 /blue red"));
    }

    #[test]
    fn test_convert_is_deterministic() {
        let options = Options {
            to: Format::Nexus,
            binarize: true,
            ..Options::default()
        };
        assert_eq!(
            convert(TABULAR, &options).unwrap(),
            convert(TABULAR, &options).unwrap()
        );
    }

    #[test]
    fn test_convert_applies_slugging() {
        let source = "Taxon,Character,State\nTaxon One,c 1,x\n";
        let output = convert(source, &Options::default()).unwrap();
        assert!(output.contains("Taxon_One,c_1,x"));
    }

    #[test]
    fn test_convert_binarizes() {
        let options = Options {
            binarize: true,
            ..Options::default()
        };
        let output = convert(TABULAR, &options).unwrap();
        assert!(output.contains("A,c1_ASCERTAINMENT,0"));
        assert!(output.contains("A,c1_red,1"));
        assert!(output.contains("B,c1_red,0"));
    }
}
