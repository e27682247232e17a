// Category code tables for the Kotus word list (cf. sanalistan-kuvaus.txt).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SterileError};
use crate::types::Entry;

// Adjectives, loanwords, numerals, adverbs and the like.
const KOTUS_EXCLUDED: &[u16] = &[14, 15, 16, 17, 26, 31, 32, 34, 35, 36, 37, 43, 45, 46, 99];

const KOTUS_NOUNS: &[u16] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 18, 19, 20, 21, 22, 23, 24, 25, 27, 28, 29, 30, 33,
    38, 39, 40, 41, 42, 44, 47, 48, 49, 50, 51,
];

// Verb inflection classes form one contiguous block.
const KOTUS_VERB_FIRST: u16 = 52;
const KOTUS_VERB_LAST: u16 = 78;

/// Static partition of category codes into excluded, noun and verb sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Taxonomy {
    #[serde(default)]
    pub excluded: BTreeSet<u16>,
    #[serde(default)]
    pub noun: BTreeSet<u16>,
    #[serde(default)]
    pub verb: BTreeSet<u16>,
}

impl Taxonomy {
    /// The reference tables for the Kotus *nykysuomen sanalista*.
    pub fn kotus() -> Self {
        Self {
            excluded: KOTUS_EXCLUDED.iter().copied().collect(),
            noun: KOTUS_NOUNS.iter().copied().collect(),
            verb: (KOTUS_VERB_FIRST..=KOTUS_VERB_LAST).collect(),
        }
    }

    /// Parse a JSON taxonomy document. `origin` only labels errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self> {
        let taxonomy: Taxonomy =
            serde_json::from_str(json).map_err(|e| SterileError::Taxonomy {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Load and validate a JSON taxonomy file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| SterileError::io(path, e))?;
        Self::from_json_str(&json, path)
    }

    /// Reject a taxonomy with no codes at all, or with a code in two sets.
    pub fn validate(&self) -> Result<()> {
        if self.excluded.is_empty() && self.noun.is_empty() && self.verb.is_empty() {
            return Err(SterileError::EmptyCategoryList);
        }
        let overlap = self
            .noun
            .intersection(&self.verb)
            .chain(self.noun.intersection(&self.excluded))
            .chain(self.verb.intersection(&self.excluded))
            .min();
        match overlap {
            Some(&code) => Err(SterileError::OverlappingCategories { code }),
            None => Ok(()),
        }
    }

    pub fn is_excluded(&self, code: u16) -> bool {
        self.excluded.contains(&code)
    }

    /// True if any sense of the entry carries a noun code.
    pub fn is_noun(&self, entry: &Entry) -> bool {
        entry.senses.iter().any(|s| self.noun.contains(&s.category_code))
    }

    /// True if any sense of the entry carries a verb code.
    pub fn is_verb(&self, entry: &Entry) -> bool {
        entry.senses.iter().any(|s| self.verb.contains(&s.category_code))
    }
}
