//! End-to-end conversion tests against exact expected strings.

use anyhow::Result;

use panphylo::{convert, Ascertainment, ColumnSpec, Format, Options, SlugLevel};

const LINGUISTIC_CSV: &str = "Language,Feature,Value
Mainland A,word order,SOV
Mainland A,tone,yes
Island (B),word order,SVO
Island (B),tone,no
";

#[test]
fn test_csv_to_nexus_full_document() -> Result<()> {
    let options = Options {
        to: Format::Nexus,
        ..Options::default()
    };
    let nexus = convert(LINGUISTIC_CSV, &options)?;

    assert_eq!(
        nexus,
        "#NEXUS

BEGIN TAXA;
    DIMENSIONS NTAX=2;
    TAXLABELS
        Island_B
        Mainland_A
    ;
END;

BEGIN CHARACTERS;
    DIMENSIONS NCHAR=2;
    FORMAT DATATYPE=STANDARD MISSING=? GAP=- SYMBOLS=\"01\";
    CHARSTATELABELS
        1 tone /no yes,
        2 word_order /SOV SVO
    ;

MATRIX
Island_B      01
Mainland_A    10
;

END;
"
    );
    Ok(())
}

#[test]
fn test_nexus_back_to_csv() -> Result<()> {
    let to_nexus = Options {
        to: Format::Nexus,
        ..Options::default()
    };
    let nexus = convert(LINGUISTIC_CSV, &to_nexus)?;
    let csv = convert(&nexus, &Options::default())?;

    assert_eq!(
        csv,
        "Taxon,Character,State
Island_B,tone,no
Mainland_A,tone,yes
Island_B,word_order,SVO
Mainland_A,word_order,SOV
"
    );
    Ok(())
}

#[test]
fn test_binarized_phylip_output() -> Result<()> {
    let options = Options {
        to: Format::Phylip,
        binarize: true,
        ascertainment: Ascertainment::False,
        ..Options::default()
    };
    let phylip = convert(LINGUISTIC_CSV, &options)?;

    // tone_no, tone_yes, word_order_SOV, word_order_SVO
    assert_eq!(
        phylip,
        "2 4\nIsland_B      1001\nMainland_A    0110\n"
    );
    Ok(())
}

#[test]
fn test_tsv_output_with_custom_columns() -> Result<()> {
    let options = Options {
        to: Format::Tsv,
        output_columns: ColumnSpec {
            taxa: Some("Doculect".to_string()),
            characters: Some("Feature".to_string()),
            states: Some("Observation".to_string()),
        },
        ..Options::default()
    };
    let tsv = convert(LINGUISTIC_CSV, &options)?;

    assert!(tsv.starts_with("Doculect\tFeature\tObservation\n"));
    assert!(tsv.contains("Mainland_A\ttone\tyes\n"));
    Ok(())
}

#[test]
fn test_slugging_disabled_keeps_labels() -> Result<()> {
    let options = Options {
        slug_taxa: SlugLevel::None,
        slug_chars: SlugLevel::None,
        ..Options::default()
    };
    let csv = convert(LINGUISTIC_CSV, &options)?;

    assert!(csv.contains("Island (B),word order,SVO"));
    Ok(())
}

#[test]
fn test_unknown_output_format_is_rejected() {
    assert!("newick".parse::<Format>().is_err());
    assert!(Format::from_path("-").is_err());
}
