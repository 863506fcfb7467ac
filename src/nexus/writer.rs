//! Rendering of the internal representation back to NEXUS text.

use std::collections::BTreeMap;

use crate::model::PhyloData;
use crate::utils::indexes2ranges;

/// Builds a full NEXUS representation of the dataset: the `#NEXUS` header,
/// a TAXA block, a CHARACTERS block, and an ASSUMPTIONS block when every
/// character is binary.
#[must_use]
pub fn build_nexus(phyd: &PhyloData) -> String {
    // Dataset-level flags are computed once and threaded through the
    // builders instead of being re-derived per block.
    let is_genetic = phyd.is_genetic();
    let is_binary = phyd.is_binary();

    let mut components = vec![
        "#NEXUS".to_string(),
        build_taxa_block(phyd),
        build_character_block(phyd, is_genetic, is_binary),
    ];
    if is_binary {
        components.push(build_assumption_block(phyd));
    }

    let mut buffer = components.join("\n\n");
    buffer.push('\n');
    buffer
}

/// Builds the NEXUS TAXA block with sorted taxon labels
fn build_taxa_block(phyd: &PhyloData) -> String {
    let labels: Vec<String> = phyd.taxa().map(|taxon| format!("        {taxon}")).collect();

    format!(
        "BEGIN TAXA;\n    DIMENSIONS NTAX={};\n    TAXLABELS\n{}\n    ;\nEND;",
        phyd.num_taxa(),
        labels.join("\n"),
    )
}

/// Builds the NEXUS CHARACTERS block: dimensions, format, charstatelabels,
/// and the matrix command.
fn build_character_block(phyd: &PhyloData, is_genetic: bool, is_binary: bool) -> String {
    // All-genetic data is declared as DNA and written with its raw state
    // tokens; everything else declares the derived symbol alphabet.
    let format_line = if is_genetic {
        "    FORMAT DATATYPE=DNA MISSING=? GAP=-;".to_string()
    } else {
        format!(
            "    FORMAT DATATYPE=STANDARD MISSING=? GAP=- SYMBOLS=\"{}\";",
            phyd.symbols().iter().collect::<String>(),
        )
    };

    let labels: Vec<String> = phyd
        .characters()
        .map(|(char_id, character)| {
            if is_genetic || is_binary {
                char_id.to_string()
            } else {
                format!("{char_id} /{}", character.states().join(" "))
            }
        })
        .collect();
    let charstatelabels: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| format!("        {} {label}", idx + 1))
        .collect();

    format!(
        "BEGIN CHARACTERS;\n    DIMENSIONS NCHAR={};\n{}\n    CHARSTATELABELS\n{}\n    ;\n\n{}\n\nEND;",
        phyd.num_characters(),
        format_line,
        charstatelabels.join(",\n"),
        build_matrix_command(phyd),
    )
}

/// Builds the NEXUS MATRIX command, with taxon labels left-padded to the
/// longest label
fn build_matrix_command(phyd: &PhyloData) -> String {
    let matrix = phyd.matrix();
    let taxon_length = matrix.iter().map(|(taxon, _)| taxon.len()).max().unwrap_or(0);

    let rows: Vec<String> = matrix
        .iter()
        .map(|(taxon, vector)| format!("{taxon:<taxon_length$}    {vector}"))
        .collect();

    format!("MATRIX\n{}\n;", rows.join("\n"))
}

/// Builds the NEXUS ASSUMPTIONS block, grouping characters into charsets
/// by their base name (the name with its final `_<suffix>` component
/// stripped, as produced by binarization).
fn build_assumption_block(phyd: &PhyloData) -> String {
    let mut indexes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, (char_id, _)) in phyd.characters().enumerate() {
        let base = char_id.rsplit_once('_').map_or(char_id, |(base, _)| base);
        indexes.entry(base).or_default().push(idx + 1);
    }

    let charsets: Vec<String> = indexes
        .iter()
        .map(|(base, columns)| format!("    CHARSET {base} = {};", indexes2ranges(columns)))
        .collect();

    format!("BEGIN ASSUMPTIONS;\n{}\nEND;", charsets.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nexus::parser::read_data_nexus;

    fn multistate() -> PhyloData {
        let mut phyd = PhyloData::new();
        phyd.extend("A", "c1", None, "red");
        phyd.extend("A", "c2", None, "yes");
        phyd.extend("B", "c1", None, "blue");
        phyd.extend("B", "c2", None, "?");
        phyd
    }

    #[test]
    fn test_build_nexus_multistate() {
        let expected = "#NEXUS

BEGIN TAXA;
    DIMENSIONS NTAX=2;
    TAXLABELS
        A
        B
    ;
END;

BEGIN CHARACTERS;
    DIMENSIONS NCHAR=2;
    FORMAT DATATYPE=STANDARD MISSING=? GAP=- SYMBOLS=\"01\";
    CHARSTATELABELS
        1 c1 /blue red,
        2 c2 /yes
    ;

MATRIX
A    10
B    0?
;

END;
";
        assert_eq!(build_nexus(&multistate()), expected);
    }

    #[test]
    fn test_build_nexus_binary_has_assumptions() {
        let mut phyd = PhyloData::new();
        for taxon in ["A", "B"] {
            phyd.extend(taxon, "c1_red", None, "1");
            phyd.extend(taxon, "c1_blue", None, "0");
            phyd.extend(taxon, "c2_yes", None, "1");
        }
        let nexus = build_nexus(&phyd);

        assert!(nexus.contains("BEGIN ASSUMPTIONS;"));
        assert!(nexus.contains("    CHARSET c1 = 1-2;"));
        assert!(nexus.contains("    CHARSET c2 = 3;"));
        // binary data writes bare character names
        assert!(nexus.contains("        1 c1_blue,"));
        assert!(!nexus.contains('/'));
    }

    #[test]
    fn test_build_nexus_genetic_omits_symbols() {
        let mut phyd = PhyloData::new();
        phyd.extend("t1", "c1", None, "A");
        phyd.extend("t2", "c1", None, "T");
        let nexus = build_nexus(&phyd);

        assert!(nexus.contains("FORMAT DATATYPE=DNA MISSING=? GAP=-;"));
        assert!(!nexus.contains("SYMBOLS"));
        assert!(nexus.contains("t1    A"));
    }

    #[test]
    fn test_nexus_round_trip() {
        let source = multistate();
        let rendered = build_nexus(&source);
        let parsed = read_data_nexus(&rendered).unwrap();

        assert_eq!(
            parsed.observation("A", "c1").unwrap().iter().collect::<Vec<_>>(),
            vec!["red"]
        );
        assert_eq!(
            parsed.observation("B", "c1").unwrap().iter().collect::<Vec<_>>(),
            vec!["blue"]
        );
        assert_eq!(
            parsed.observation("B", "c2").unwrap().iter().collect::<Vec<_>>(),
            vec!["?"]
        );
        assert_eq!(build_nexus(&parsed), rendered);
    }
}
