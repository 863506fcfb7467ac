//! Reading and writing of NEXUS character matrices.
//!
//! The parser is a line-fed automaton over BEGIN/END blocks that collects
//! the statements relevant to character data (DIMENSIONS, FORMAT,
//! CHARSTATELABELS, MATRIX, CHARSET) and ignores the rest; the writer
//! renders TAXA, CHARACTERS, and ASSUMPTIONS blocks from the internal
//! representation.

pub(crate) mod parser;
pub(crate) mod writer;

pub use parser::{parse_nexus, read_data_nexus, CharsetRange, NexusData};
pub use writer::build_nexus;
