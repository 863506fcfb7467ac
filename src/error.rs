/// Custom Result type for panphylo operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the panphylo library, encompassing all possible
/// error cases that can occur while reading, transforming, or writing
/// phylogenetic data.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Malformed input in one of the supported source formats
    ParseError(#[from] ParseError),
    /// Unsupported or ambiguous conversion configuration
    OptionsError(#[from] OptionsError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Errors from the csv crate while reading or writing tabular data
    CsvError(#[from] csv::Error),
}

/// Errors raised when source data cannot be parsed.
///
/// All of these indicate malformed input; they are raised at the point of
/// detection and propagate to the caller uncaught. A failed conversion
/// produces no output.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// The first non-whitespace content of a NEXUS source is not `#NEXUS`
    #[error("Input does not start with a #NEXUS header")]
    MissingNexusHeader,

    /// A statement outside a block could not be parsed as `BEGIN <name>;`
    ///
    /// # Arguments
    /// * `usize` - The character offset where the statement ends
    #[error("Unable to parse NEXUS block at char {0}")]
    MalformedBlock(usize),

    /// A statement inside a block was recognized but could not be parsed
    #[error("Malformed NEXUS statement: {0}")]
    MalformedStatement(String),

    /// A PHYLIP source is missing the `<ntax> <nchar>` header line
    #[error("Missing PHYLIP header with taxon and character counts")]
    MissingPhylipHeader,

    /// The number of alignment rows does not match the declared taxon count
    #[error("Number of taxa ({got}) does not match the header ({expected})")]
    TaxaCountMismatch { expected: usize, got: usize },

    /// Alignment vectors within one source have different lengths
    #[error("Mismatch in alignment lengths")]
    UnevenVectors,

    /// The alignment length differs from the declared character count
    #[error("Alignment length ({got}) differs from the header ({expected})")]
    VectorLengthMismatch { expected: usize, got: usize },

    /// An alignment row is missing either the taxon label or the vector
    #[error("Malformed alignment row: {0}")]
    MalformedRow(String),

    /// A tabular column could not be provided or inferred
    #[error("Unable to resolve the {0} column from the header")]
    UnresolvedColumn(&'static str),

    /// Two or more of the resolved tabular columns point at the same field
    #[error("Non-unique column names: {0}")]
    NonUniqueColumns(String),
}

/// Errors raised when the requested conversion cannot be configured.
#[derive(thiserror::Error, Debug)]
pub enum OptionsError {
    /// An unknown value was passed for the input or output format
    #[error("Unknown format `{0}`")]
    UnknownFormat(String),

    /// An unknown value was passed for a slugging level
    #[error("Unknown level of slugging `{0}`")]
    UnknownSlugLevel(String),

    /// An unknown value was passed for the ascertainment mode
    #[error("Unknown ascertainment mode `{0}`")]
    UnknownAscertainment(String),

    /// The output format could not be detected from the output name
    #[error("Unable to detect output format; please specify it with `--to`")]
    UndetectableFormat,

    /// An unknown character encoding label was requested
    #[error("Unknown character encoding `{0}`")]
    UnknownEncoding(String),
}
