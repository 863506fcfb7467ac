use std::collections::{BTreeMap, BTreeSet};

use crate::model::Character;
use crate::slug::{unique_ids, SlugLevel};

/// The alphabet from which matrix symbols are drawn: the k-th canonical
/// state of a character maps to the k-th entry here.
pub const SYMBOL_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The internal representation of a phylogenetic dataset.
///
/// Owns the set of taxa, a map from character id to [`Character`], and an
/// observation map keyed by (taxon, character). A taxon may carry zero, one,
/// or multiple state tokens per character (polymorphism), so observations
/// are sets.
///
/// All containers are ordered, so every derived view (taxa, characters,
/// matrix) iterates in sorted order and repeated calls agree bit-for-bit.
#[derive(Debug, Clone, Default)]
pub struct PhyloData {
    taxa: BTreeSet<String>,
    characters: BTreeMap<String, Character>,
    observations: BTreeMap<(String, String), BTreeSet<String>>,
}

impl PhyloData {
    /// Creates an empty dataset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observed state token, the single mutation entrypoint.
    ///
    /// Registers the taxon, creates or extends the [`Character`] keyed by
    /// `charset` (defaulting to the character id itself when no grouping is
    /// given), and records the token in the observation set under the
    /// resolved id.
    pub fn extend(&mut self, taxon: &str, character: &str, charset: Option<&str>, value: &str) {
        let charset_id = charset.unwrap_or(character);

        self.taxa.insert(taxon.to_string());
        self.characters
            .entry(charset_id.to_string())
            .or_default()
            .add_state(value);
        self.observations
            .entry((taxon.to_string(), charset_id.to_string()))
            .or_default()
            .insert(value.to_string());
    }

    /// Sorted view of the taxa
    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(String::as_str)
    }

    /// Sorted view of the characters and their definitions
    pub fn characters(&self) -> impl Iterator<Item = (&str, &Character)> {
        self.characters
            .iter()
            .map(|(id, character)| (id.as_str(), character))
    }

    /// Looks up a character definition by id
    #[must_use]
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Number of taxa
    #[must_use]
    pub fn num_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Number of characters
    #[must_use]
    pub fn num_characters(&self) -> usize {
        self.characters.len()
    }

    /// Returns the observation set for a (taxon, character) pair, if any
    /// token was recorded for it
    #[must_use]
    pub fn observation(&self, taxon: &str, character: &str) -> Option<&BTreeSet<String>> {
        self.observations
            .get(&(taxon.to_string(), character.to_string()))
    }

    /// The character cardinality: the number of canonical states in the
    /// character(s) with the largest state set, or zero for an empty
    /// dataset.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.characters
            .values()
            .map(Character::len)
            .max()
            .unwrap_or(0)
    }

    /// The unique symbols used for representing states, drawn from
    /// [`SYMBOL_ALPHABET`] and as long as the data cardinality
    #[must_use]
    pub fn symbols(&self) -> Vec<char> {
        SYMBOL_ALPHABET.chars().take(self.cardinality()).collect()
    }

    /// Whether every character in the dataset is binary
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.characters.values().all(Character::is_binary)
    }

    /// Whether every character in the dataset is genetic
    #[must_use]
    pub fn is_genetic(&self) -> bool {
        self.characters.values().all(Character::is_genetic)
    }

    /// The matrix projection: one `(taxon, vector)` row per taxon in sorted
    /// order, with one cell per character in sorted order.
    ///
    /// Each cell is `-` when there is no observation, `?` when the only
    /// observation is the missing token, the mapped symbol for a
    /// single observation, or a parenthesized comma-joined list of symbols
    /// for polymorphic observations. Genetic and binary datasets render
    /// their raw state tokens instead of mapped symbols, as those are
    /// already drawn from the writable alphabets.
    ///
    /// The projection is recomputed on every call rather than cached.
    #[must_use]
    pub fn matrix(&self) -> Vec<(String, String)> {
        let symbols = self.symbols();
        let literal = self.is_genetic() || self.is_binary();

        let mut rows: BTreeMap<&str, String> = self
            .taxa
            .iter()
            .map(|taxon| (taxon.as_str(), String::new()))
            .collect();

        for (char_id, character) in &self.characters {
            let states = character.states();
            for taxon in &self.taxa {
                let cell = match self.observation(taxon, char_id) {
                    None => "-".to_string(),
                    Some(obs) if obs.len() == 1 && obs.contains(character.missing()) => {
                        "?".to_string()
                    }
                    Some(obs) => {
                        let mut reprs: Vec<String> = obs
                            .iter()
                            .map(|token| {
                                if literal {
                                    token.clone()
                                } else {
                                    states
                                        .iter()
                                        .position(|state| state == token)
                                        .and_then(|k| symbols.get(k))
                                        .map_or_else(|| "?".to_string(), char::to_string)
                                }
                            })
                            .collect();
                        reprs.sort_unstable();
                        if reprs.len() == 1 {
                            reprs.remove(0)
                        } else {
                            format!("({})", reprs.join(","))
                        }
                    }
                };
                if let Some(row) = rows.get_mut(taxon.as_str()) {
                    row.push_str(&cell);
                }
            }
        }

        rows.into_iter()
            .map(|(taxon, vector)| (taxon.to_string(), vector))
            .collect()
    }

    /// Slugs taxa labels at the given level, preserving uniqueness of ids
    /// and updating all observation keys atomically
    pub fn slug_taxa(&mut self, level: SlugLevel) {
        let originals: Vec<String> = self.taxa.iter().cloned().collect();
        let slugged = unique_ids(&originals, level);
        let mapping: BTreeMap<String, String> = originals.into_iter().zip(slugged).collect();
        tracing::debug!(level = %level, taxa = mapping.len(), "slugging taxa labels");

        self.taxa = mapping.values().cloned().collect();
        self.observations = std::mem::take(&mut self.observations)
            .into_iter()
            .map(|((taxon, character), values)| {
                let taxon = mapping.get(&taxon).cloned().unwrap_or(taxon);
                ((taxon, character), values)
            })
            .collect();
    }

    /// Slugs character labels at the given level, preserving uniqueness of
    /// ids and updating all observation keys atomically
    pub fn slug_chars(&mut self, level: SlugLevel) {
        let originals: Vec<String> = self.characters.keys().cloned().collect();
        let slugged = unique_ids(&originals, level);
        let mapping: BTreeMap<String, String> = originals.into_iter().zip(slugged).collect();
        tracing::debug!(level = %level, characters = mapping.len(), "slugging character labels");

        self.characters = std::mem::take(&mut self.characters)
            .into_iter()
            .map(|(id, character)| (mapping.get(&id).cloned().unwrap_or(id), character))
            .collect();
        self.observations = std::mem::take(&mut self.observations)
            .into_iter()
            .map(|((taxon, character), values)| {
                let character = mapping.get(&character).cloned().unwrap_or(character);
                ((taxon, character), values)
            })
            .collect();
    }
}
