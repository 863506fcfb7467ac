//! Label normalization ("slugging") utilities.
//!
//! Taxon and character labels arrive from the wild: diacritics, embedded
//! whitespace, punctuation. Downstream formats such as NEXUS and PHYLIP are
//! much happier with identifier-safe names, so this module provides
//! [`slug`] for normalizing a single label and [`unique_ids`] for
//! normalizing a whole collection while guaranteeing that the result is a
//! bijection even when distinct inputs collapse to the same slug.

use std::collections::HashMap;
use std::str::FromStr;

use deunicode::deunicode;

use crate::error::{Error, OptionsError};

/// Level of normalization applied by [`slug`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlugLevel {
    /// Identity; labels pass through untouched
    None,
    /// Transliterate to ASCII, collapse whitespace runs to `_`, and keep
    /// only `[A-Za-z0-9_-]`
    #[default]
    Simple,
    /// Transliterate to ASCII, lowercase, and keep only ASCII letters
    Full,
}

impl FromStr for SlugLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "simple" => Ok(Self::Simple),
            "full" => Ok(Self::Full),
            other => Err(OptionsError::UnknownSlugLevel(other.to_string()).into()),
        }
    }
}

impl std::fmt::Display for SlugLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Simple => write!(f, "simple"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Returns a slugged version of a label.
///
/// Note that, as this operates on a single string, there is no guarantee of
/// non-collision; use [`unique_ids`] for that.
///
/// # Examples
///
/// ```
/// use panphylo::{slug, SlugLevel};
///
/// assert_eq!(slug("Åland (#3) [?]", SlugLevel::None), "Åland (#3) [?]");
/// assert_eq!(slug("Åland (#3) [?]", SlugLevel::Simple), "Aland_3");
/// assert_eq!(slug("Åland (#3) [?]", SlugLevel::Full), "aland");
/// ```
#[must_use]
pub fn slug(label: &str, level: SlugLevel) -> String {
    match level {
        SlugLevel::None => label.to_string(),
        SlugLevel::Simple => {
            let kept: String = deunicode(label)
                .chars()
                .filter(|c| {
                    c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || c.is_whitespace()
                })
                .collect();
            kept.split_whitespace().collect::<Vec<_>>().join("_")
        }
        SlugLevel::Full => deunicode(label)
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect(),
    }
}

/// Maps a sequence of labels to slugged versions with unique identifiers.
///
/// The output has the same length and order as the input. Labels whose
/// slugged form occurs more than once across the whole input receive a
/// deterministic per-occurrence suffix (`-a`, `-b`, ..., `-z`, `-aa`, ...),
/// assigned in order of appearance; labels whose slugged form is unique are
/// left bare.
///
/// # Examples
///
/// ```
/// use panphylo::{unique_ids, SlugLevel};
///
/// let ids = unique_ids(&["a", "a", "e", "e", "e"], SlugLevel::Full);
/// assert_eq!(ids, vec!["a-a", "a-b", "e-a", "e-b", "e-c"]);
/// ```
pub fn unique_ids<S: AsRef<str>>(labels: &[S], level: SlugLevel) -> Vec<String> {
    let slugged: Vec<String> = labels.iter().map(|l| slug(l.as_ref(), level)).collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for value in &slugged {
        *totals.entry(value).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    slugged
        .iter()
        .map(|value| {
            if totals[value.as_str()] > 1 {
                let occurrence = seen.entry(value).or_insert(0);
                let suffixed = format!("{value}{}", occurrence_suffix(*occurrence));
                *occurrence += 1;
                suffixed
            } else {
                value.clone()
            }
        })
        .collect()
}

/// Builds the n-th element of the infinite suffix sequence
/// `-a, -b, ..., -z, -aa, -ab, ..., -zz, -aaa, ...` (0-indexed).
fn occurrence_suffix(mut n: usize) -> String {
    let mut len = 1;
    let mut block = 26;
    while n >= block {
        n -= block;
        len += 1;
        block *= 26;
    }

    let mut chars = vec![b'a'; len];
    for slot in chars.iter_mut().rev() {
        *slot = b'a' + (n % 26) as u8;
        n /= 26;
    }

    format!("-{}", String::from_utf8(chars).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_levels() {
        let label = "Åland (#3) [?]";
        assert_eq!(slug(label, SlugLevel::None), "Åland (#3) [?]");
        assert_eq!(slug(label, SlugLevel::Simple), "Aland_3");
        assert_eq!(slug(label, SlugLevel::Full), "aland");
    }

    #[test]
    fn test_slug_whitespace_collapse() {
        assert_eq!(slug("  a   b\tc  ", SlugLevel::Simple), "a_b_c");
        assert_eq!(slug("Ma'anyan", SlugLevel::Simple), "Maanyan");
    }

    #[test]
    fn test_slug_level_parsing() {
        assert_eq!("simple".parse::<SlugLevel>().unwrap(), SlugLevel::Simple);
        assert_eq!("FULL".parse::<SlugLevel>().unwrap(), SlugLevel::Full);
        assert!("fancy".parse::<SlugLevel>().is_err());
    }

    #[test]
    fn test_unique_ids_duplicates() {
        let ids = unique_ids(&["a", "a", "e", "e", "e"], SlugLevel::Full);
        assert_eq!(ids, vec!["a-a", "a-b", "e-a", "e-b", "e-c"]);
    }

    #[test]
    fn test_unique_ids_collapsing_inputs() {
        // Distinct inputs that slug to the same value still get unique ids
        let ids = unique_ids(&["a", "'a", "e", "é", "è"], SlugLevel::Full);
        assert_eq!(ids, vec!["a-a", "a-b", "e-a", "e-b", "e-c"]);
    }

    #[test]
    fn test_unique_ids_mixed() {
        let ids = unique_ids(&["x", "y", "x"], SlugLevel::None);
        assert_eq!(ids, vec!["x-a", "y", "x-b"]);
    }

    #[test]
    fn test_occurrence_suffix_rollover() {
        assert_eq!(occurrence_suffix(0), "-a");
        assert_eq!(occurrence_suffix(25), "-z");
        assert_eq!(occurrence_suffix(26), "-aa");
        assert_eq!(occurrence_suffix(27), "-ab");
        assert_eq!(occurrence_suffix(26 + 26 * 26), "-aaa");
    }
}
