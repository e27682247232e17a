// Noun → verb derivation matcher.
//
// Each pass compares the first `t` characters of every noun against the verb
// list and prunes both sides of every match before the next, shorter pass:
//
//   1. snapshot the noun and verb headword lists from the working corpus
//   2. pair each noun with the first verb sharing its `t`-character prefix
//   3. remove all entries carrying a matched headword, in one batch
//
// Matching reads only the snapshot, so every noun sees the same verb list
// regardless of what earlier nouns in the pass matched.

use std::collections::HashSet;

use crate::corpus::Corpus;
use crate::error::{Result, SterileError};
use crate::taxonomy::Taxonomy;
use crate::types::{DerivationPair, ThresholdReport};

pub const DEFAULT_MAX_THRESHOLD: usize = 12;
pub const DEFAULT_MIN_THRESHOLD: usize = 5;
/// Longer than any headword in the word list.
pub const MAX_THRESHOLD: usize = 64;

/// Strictly descending, non-zero prefix lengths, one per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds(Vec<usize>);

impl Thresholds {
    pub fn new(values: Vec<usize>) -> Result<Self> {
        if values.is_empty() {
            return Err(SterileError::InvalidThresholds(
                "at least one threshold is required".to_string(),
            ));
        }
        if values.contains(&0) {
            return Err(SterileError::InvalidThresholds(
                "thresholds must be positive".to_string(),
            ));
        }
        if let Some(&too_long) = values.iter().find(|&&t| t > MAX_THRESHOLD) {
            return Err(SterileError::InvalidThresholds(format!(
                "threshold {too_long} exceeds the limit of {MAX_THRESHOLD}"
            )));
        }
        if let Some(w) = values.windows(2).find(|w| w[0] <= w[1]) {
            return Err(SterileError::InvalidThresholds(format!(
                "thresholds must strictly decrease, got {} then {}",
                w[0], w[1]
            )));
        }
        Ok(Self(values))
    }

    /// Every length from `max` down to `min`, inclusive.
    pub fn descending(max: usize, min: usize) -> Result<Self> {
        if min > max {
            return Err(SterileError::InvalidThresholds(format!(
                "minimum {min} exceeds maximum {max}"
            )));
        }
        if max > MAX_THRESHOLD {
            return Err(SterileError::InvalidThresholds(format!(
                "threshold {max} exceeds the limit of {MAX_THRESHOLD}"
            )));
        }
        Self::new((min..=max).rev().collect())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self((DEFAULT_MIN_THRESHOLD..=DEFAULT_MAX_THRESHOLD).rev().collect())
    }
}

/// The first `n` characters of `s`, or all of `s` if it is shorter.
pub fn leading(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Immutable per-pass view of the headwords eligible for comparison, in
/// corpus order, each headword listed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub nouns: Vec<String>,
    pub verbs: Vec<String>,
}

impl Candidates {
    /// An entry with both noun and verb senses lands in both lists.
    pub fn snapshot(corpus: &Corpus, taxonomy: &Taxonomy) -> Self {
        let mut nouns = Vec::new();
        let mut verbs = Vec::new();
        let mut seen_nouns = HashSet::new();
        let mut seen_verbs = HashSet::new();

        for entry in corpus.entries() {
            let word = entry.headword.as_str();
            if taxonomy.is_noun(entry) && seen_nouns.insert(word) {
                nouns.push(word.to_string());
            }
            if taxonomy.is_verb(entry) && seen_verbs.insert(word) {
                verbs.push(word.to_string());
            }
        }

        Self { nouns, verbs }
    }
}

/// Runs derivation passes against a working corpus.
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    taxonomy: &'a Taxonomy,
    allow_self_match: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            allow_self_match: true,
        }
    }

    /// Whether a headword that is both noun and verb may match itself.
    pub fn allow_self_match(mut self, allow: bool) -> Self {
        self.allow_self_match = allow;
        self
    }

    /// Pair each noun with the first verb sharing its leading `threshold`
    /// characters. Pure: reads the snapshot only.
    pub fn find_matches(&self, candidates: &Candidates, threshold: usize) -> Vec<DerivationPair> {
        let verb_prefixes: Vec<(&str, &str)> = candidates
            .verbs
            .iter()
            .map(|v| (v.as_str(), leading(v, threshold)))
            .collect();

        candidates
            .nouns
            .iter()
            .filter_map(|noun| {
                let prefix = leading(noun, threshold);
                verb_prefixes
                    .iter()
                    .filter(|(verb, _)| self.allow_self_match || *verb != noun.as_str())
                    .find(|(_, verb_prefix)| *verb_prefix == prefix)
                    .map(|(verb, _)| DerivationPair {
                        noun: noun.clone(),
                        verb: verb.to_string(),
                    })
            })
            .collect()
    }

    /// One full pass: snapshot, match, then prune every matched headword.
    pub fn run_pass(&self, corpus: &mut Corpus, threshold: usize) -> ThresholdReport {
        let candidates = Candidates::snapshot(corpus, self.taxonomy);
        let pairs = self.find_matches(&candidates, threshold);

        for pair in &pairs {
            tracing::debug!(noun = %pair.noun, verb = %pair.verb, "derivation");
        }

        let matched: HashSet<&str> = pairs
            .iter()
            .flat_map(|p| [p.noun.as_str(), p.verb.as_str()])
            .collect();
        let removed = corpus.remove_headwords(&matched);

        tracing::info!(
            threshold,
            nouns = candidates.nouns.len(),
            verbs = candidates.verbs.len(),
            matches = pairs.len(),
            removed,
            remaining = corpus.len(),
            "pass complete"
        );

        ThresholdReport { threshold, pairs }
    }

    /// Every pass in order, without touching the filesystem.
    pub fn run_all(&self, corpus: &mut Corpus, thresholds: &Thresholds) -> Vec<ThresholdReport> {
        thresholds
            .iter()
            .map(|t| self.run_pass(corpus, t))
            .collect()
    }
}
