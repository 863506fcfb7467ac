//! Small helpers shared across readers and writers.

/// Transforms a sequence of 1-based indexes into a textual range
/// representation, as used by NEXUS-like assumption blocks.
///
/// The input does not need to be sorted.
///
/// # Examples
///
/// ```
/// use panphylo::indexes2ranges;
///
/// assert_eq!(indexes2ranges(&[1, 2, 3, 5, 8, 9]), "1-3, 5, 8-9");
/// ```
#[must_use]
pub fn indexes2ranges(indexes: &[usize]) -> String {
    let mut sorted = indexes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in sorted {
        match ranges.last_mut() {
            Some((_, end)) if idx == *end + 1 => *end = idx,
            _ => ranges.push((idx, idx)),
        }
    }

    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the positional name for the zero-based column `index` of an
/// alignment with `nchar` columns, zero-padding the index to the decimal
/// width of the alignment.
pub(crate) fn positional_character(index: usize, nchar: usize) -> String {
    let width = if nchar > 1 {
        (nchar as f64).log10().ceil() as usize
    } else {
        1
    };
    format!("CHAR_{index:0width$}")
}
