//! Expansion of multistate characters into presence/absence columns.

use std::str::FromStr;

use crate::error::{Error, OptionsError};
use crate::model::PhyloData;

/// Suffix of the extra all-zero column emitted per character when
/// ascertainment correction is active
pub const ASCERTAINMENT_SUFFIX: &str = "_ASCERTAINMENT";

/// Policy for emitting ascertainment-correction columns during
/// binarization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ascertainment {
    /// Resolve to `False` when every character in the input is genetic,
    /// to `True` otherwise
    #[default]
    Default,
    /// Always emit ascertainment columns
    True,
    /// Never emit ascertainment columns
    False,
}

impl FromStr for Ascertainment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "true" => Ok(Self::True),
            "false" => Ok(Self::False),
            other => Err(OptionsError::UnknownAscertainment(other.to_string()).into()),
        }
    }
}

impl Ascertainment {
    /// Resolves the mode against a dataset: `Default` falls back to
    /// whether the data is non-genetic
    fn resolve(self, phyd: &PhyloData) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Default => !phyd.is_genetic(),
        }
    }
}

/// Builds a binarized version of the provided phylogenetic data.
///
/// Every character is expanded into one `{character}_{state}` binary column
/// per canonical state, in canonical state order: a taxon scores `1` for
/// states it was observed with, `0` for states it was not observed with
/// while having data for the character, and `?` for every state when its
/// only observation is the missing token. Taxa without any observation for
/// a character contribute no observation to its state columns.
///
/// When ascertainment correction is active, one extra
/// `{character}_ASCERTAINMENT` column is emitted with value `0` for every
/// (taxon, character) pair, whether or not the taxon has data for the
/// character.
///
/// The input is left untouched; a new, independent dataset is returned.
#[must_use]
pub fn binarize(phyd: &PhyloData, ascertainment: Ascertainment) -> PhyloData {
    let correct = ascertainment.resolve(phyd);
    tracing::debug!(ascertainment = correct, "binarizing dataset");

    let mut binarized = PhyloData::new();
    for (char_id, character) in phyd.characters() {
        let states = character.states();
        for taxon in phyd.taxa() {
            if correct {
                binarized.extend(taxon, &format!("{char_id}{ASCERTAINMENT_SUFFIX}"), None, "0");
            }

            let Some(obs) = phyd.observation(taxon, char_id) else {
                continue;
            };
            let only_missing = obs.len() == 1 && obs.contains(character.missing());

            for state in &states {
                let value = if only_missing {
                    "?"
                } else if obs.contains(*state) {
                    "1"
                } else {
                    "0"
                };
                binarized.extend(taxon, &format!("{char_id}_{state}"), None, value);
            }
        }
    }

    binarized
}
