use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One grammatical classification attached to an entry (a Kotus `<t>` block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Inflection class code from the `<tn>` element.
    pub category_code: u16,
    /// Consonant gradation class from the `<av>` element, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradation: Option<String>,
}

impl Sense {
    pub fn new(category_code: u16) -> Self {
        Self {
            category_code,
            gradation: None,
        }
    }
}

/// One lexical unit of the word list (a Kotus `<st>` block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub headword: String,
    /// Homograph index from the `<hn>` element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homonym: Option<u32>,
    pub senses: Vec<Sense>,
}

impl Entry {
    /// Build an entry with one plain sense per category code.
    pub fn new(headword: impl Into<String>, codes: &[u16]) -> Self {
        Self {
            headword: headword.into(),
            homonym: None,
            senses: codes.iter().copied().map(Sense::new).collect(),
        }
    }
}

/// A noun and the first verb found sharing its leading characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationPair {
    pub noun: String,
    pub verb: String,
}

/// Every pair discovered during one pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdReport {
    pub threshold: usize,
    pub pairs: Vec<DerivationPair>,
}

/// Outcome of one pass as recorded in the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassSummary {
    pub threshold: usize,
    pub matches: usize,
    /// Entries pruned from the working corpus by this pass.
    pub removed: usize,
    /// Entries left in the working corpus after this pass.
    pub remaining: usize,
    pub report: PathBuf,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub source: PathBuf,
    pub entries_read: usize,
    pub entries_filtered: usize,
    /// Senses removed by the category filter; zero when it was skipped.
    pub dropped_senses: usize,
    /// Entries removed because no sense survived the filter.
    pub dropped_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_corpus: Option<PathBuf>,
    pub residue_corpus: PathBuf,
    pub passes: Vec<PassSummary>,
    pub sterile: ResidueCounts,
}

/// Breakdown of the entries left after the final pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueCounts {
    pub nouns: usize,
    pub verbs: usize,
    /// Entries whose senses are neither noun nor verb codes.
    pub unassessed: usize,
}
