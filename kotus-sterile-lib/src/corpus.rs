use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, SterileError};
use crate::persist;
use crate::taxonomy::Taxonomy;
use crate::types::{Entry, ResidueCounts};
use crate::xml;

/// Ordered, in-memory word list. Source order is kept through every prune.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<Entry>,
}

impl Corpus {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Read and parse a word list file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => SterileError::CorpusFormat {
                path: path.to_path_buf(),
                message: "document is not valid UTF-8".to_string(),
            },
            _ => SterileError::io(path, e),
        })?;
        let entries = xml::parse_corpus(&text, path)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded corpus");
        Ok(Self { entries })
    }

    /// Atomically write the corpus as a word list document.
    pub fn save(&self, path: &Path) -> Result<()> {
        persist::write_atomic(path, xml::serialize_corpus(&self.entries).as_bytes())
    }

    /// Write the corpus next to `path`, leaving `path` untouched until the
    /// returned file is committed.
    pub fn stage(&self, path: &Path) -> Result<persist::Staged> {
        persist::stage(path, xml::serialize_corpus(&self.entries).as_bytes())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether any entry carries this headword.
    pub fn contains(&self, headword: &str) -> bool {
        self.entries.iter().any(|e| e.headword == headword)
    }

    /// Remove every entry whose headword is in `headwords`. Returns how many
    /// entries were removed.
    pub fn remove_headwords(&mut self, headwords: &HashSet<&str>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !headwords.contains(e.headword.as_str()));
        before - self.entries.len()
    }

    /// Classify what is left: nouns, verbs and entries never compared.
    pub fn residue_counts(&self, taxonomy: &Taxonomy) -> ResidueCounts {
        let mut counts = ResidueCounts::default();
        for entry in &self.entries {
            let noun = taxonomy.is_noun(entry);
            let verb = taxonomy.is_verb(entry);
            if noun {
                counts.nouns += 1;
            }
            if verb {
                counts.verbs += 1;
            }
            if !noun && !verb {
                counts.unassessed += 1;
            }
        }
        counts
    }
}
