use std::collections::BTreeSet;

/// Default token representing missing data
const DEFAULT_MISSING: &str = "?";

/// Default token representing gaps
const DEFAULT_GAP: &str = "-";

/// The definition of one character (a matrix column): the set of state
/// tokens observed for it, plus the sentinel tokens for missing data and
/// gaps.
///
/// The sentinels are stored alongside the regular states but are excluded
/// from the canonical [`states`](Character::states) view, whose handling is
/// left to the output functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    states: BTreeSet<String>,
    missing: String,
    gap: String,
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

impl Character {
    /// Creates a new character with no observed states and the default
    /// `?`/`-` sentinels
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: BTreeSet::new(),
            missing: DEFAULT_MISSING.to_string(),
            gap: DEFAULT_GAP.to_string(),
        }
    }

    /// Creates a new character from an initial set of state tokens
    pub fn with_states<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut character = Self::new();
        for state in states {
            character.add_state(state);
        }
        character
    }

    /// Adds a state token to the character.
    ///
    /// Sentinel tokens are accepted and stored, but never surface in the
    /// canonical [`states`](Character::states) view.
    pub fn add_state(&mut self, state: impl Into<String>) {
        self.states.insert(state.into());
    }

    /// Returns the canonical view of the states: sorted, deduplicated, and
    /// with the missing/gap sentinels excluded.
    ///
    /// The lexicographic sort order is the contract for stable symbol
    /// assignment in the matrix projection.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        self.states
            .iter()
            .map(String::as_str)
            .filter(|state| *state != self.missing && *state != self.gap)
            .collect()
    }

    /// Number of canonical states
    #[must_use]
    pub fn len(&self) -> usize {
        self.states().len()
    }

    /// Returns true if the character has no canonical states
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The token representing missing data for this character
    #[must_use]
    pub fn missing(&self) -> &str {
        &self.missing
    }

    /// The token representing gaps for this character
    #[must_use]
    pub fn gap(&self) -> &str {
        &self.gap
    }

    /// Checks whether the character is binary, i.e. whether its canonical
    /// states are a subset of `{"0", "1"}`
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.states()
            .iter()
            .all(|state| matches!(*state, "0" | "1"))
    }

    /// Checks whether the character is genetic, i.e. whether every
    /// canonical state is one of the A/C/G/T nucleotides
    /// (case-insensitive).
    // TODO: extend to the full IUPAC ambiguity codes
    #[must_use]
    pub fn is_genetic(&self) -> bool {
        self.states().iter().all(|state| {
            !state.is_empty()
                && state
                    .chars()
                    .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T'))
        })
    }
}
