mod binarize;
mod convert;
mod error;
mod model;
mod nexus;
mod phylip;
mod slug;
mod stream;
mod tabular;
mod utils;

pub use binarize::{binarize, Ascertainment, ASCERTAINMENT_SUFFIX};
pub use convert::{convert, Format, Options};
pub use error::{Error, OptionsError, ParseError, Result};
pub use model::{Character, PhyloData, SYMBOL_ALPHABET};
pub use nexus::{build_nexus, parse_nexus, read_data_nexus, CharsetRange, NexusData};
pub use phylip::{build_phylip, read_data_phylip};
pub use slug::{slug, unique_ids, SlugLevel};
pub use stream::{decode, fetch_source, write_output};
pub use tabular::{build_tabular, detect_delimiter, read_data_tabular, ColumnSpec};
pub use utils::indexes2ranges;

#[cfg(test)]
mod testing {

    use super::*;
    use anyhow::Result;
    use std::collections::BTreeSet;

    const TABULAR: &str = "Taxon,Character,State
A,c1,red
A,c2,yes
B,c1,blue
B,c1,red
";

    /// Collects the (taxon, character, state) triples of a CSV rendering
    fn triples(csv: &str) -> BTreeSet<(String, String, String)> {
        csv.lines()
            .skip(1)
            .map(|line| {
                let mut fields = line.split(',');
                (
                    fields.next().unwrap().to_string(),
                    fields.next().unwrap().to_string(),
                    fields.next().unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_phylip_to_csv() -> Result<()> {
        let source = "3 4\nL01    AC-T\nL02    AG-T\nL03    CC-T\n";
        let output = convert(source, &Options::default())?;

        assert_eq!(
            output,
            "Taxon,Character,State
L01,CHAR_0,A
L02,CHAR_0,A
L03,CHAR_0,C
L01,CHAR_1,C
L02,CHAR_1,G
L03,CHAR_1,C
L01,CHAR_3,T
L02,CHAR_3,T
L03,CHAR_3,T
"
        );
        Ok(())
    }

    #[test]
    fn test_tabular_nexus_round_trip() -> Result<()> {
        let to_nexus = Options {
            to: Format::Nexus,
            ..Options::default()
        };
        let nexus = convert(TABULAR, &to_nexus)?;
        let back = convert(&nexus, &Options::default())?;

        assert_eq!(triples(&back), triples(TABULAR));
        Ok(())
    }

    #[test]
    fn test_binarized_nexus_pipeline() -> Result<()> {
        let options = Options {
            to: Format::Nexus,
            binarize: true,
            ..Options::default()
        };
        let nexus = convert(TABULAR, &options)?;

        assert!(nexus.contains("SYMBOLS=\"01\""));
        assert!(nexus.contains("BEGIN ASSUMPTIONS;"));
        assert!(nexus.contains("CHARSET c1 = 1-3;"));
        assert!(nexus.contains("CHARSET c2 = 4-5;"));
        // exactly one ascertainment column per character
        assert_eq!(nexus.matches("ASCERTAINMENT").count(), 2);
        Ok(())
    }

    #[test]
    fn test_repeated_conversions_are_identical() -> Result<()> {
        for to in [Format::Csv, Format::Tsv, Format::Nexus, Format::Phylip] {
            let options = Options {
                to,
                ..Options::default()
            };
            assert_eq!(convert(TABULAR, &options)?, convert(TABULAR, &options)?);
        }
        Ok(())
    }
}
