// Category filter: strip excluded senses before any noun/verb comparison.

use crate::corpus::Corpus;
use crate::taxonomy::Taxonomy;
use crate::types::Entry;

/// Counts describing what the filter removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub dropped_senses: usize,
    pub dropped_entries: usize,
}

/// Remove every sense with an excluded category code, then every entry left
/// with no senses. Entry order is preserved.
///
/// Codes that belong to no set are kept: such entries survive every pass
/// without ever entering a comparison list.
pub fn filter_categories(corpus: &Corpus, taxonomy: &Taxonomy) -> (Corpus, FilterStats) {
    let mut stats = FilterStats::default();
    let mut kept = Vec::with_capacity(corpus.len());

    for entry in corpus.entries() {
        let senses: Vec<_> = entry
            .senses
            .iter()
            .filter(|s| !taxonomy.is_excluded(s.category_code))
            .cloned()
            .collect();
        stats.dropped_senses += entry.senses.len() - senses.len();

        if senses.is_empty() {
            tracing::debug!(headword = %entry.headword, "dropping entry with no relevant senses");
            stats.dropped_entries += 1;
            continue;
        }
        kept.push(Entry {
            headword: entry.headword.clone(),
            homonym: entry.homonym,
            senses,
        });
    }

    tracing::info!(
        kept = kept.len(),
        dropped_entries = stats.dropped_entries,
        dropped_senses = stats.dropped_senses,
        "filtered categories"
    );
    (Corpus::new(kept), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headwords(corpus: &Corpus) -> Vec<&str> {
        corpus.entries().iter().map(|e| e.headword.as_str()).collect()
    }

    #[test]
    fn test_drops_excluded_only_entries() {
        let corpus = Corpus::new(vec![
            Entry::new("talo", &[1]),
            Entry::new("kaunis", &[41, 99]),
            Entry::new("nopea", &[15]),
            Entry::new("juosta", &[70]),
            Entry::new("kolme", &[31]),
        ]);
        let (filtered, stats) = filter_categories(&corpus, &Taxonomy::kotus());
        assert_eq!(headwords(&filtered), vec!["talo", "kaunis", "juosta"]);
        assert_eq!(stats.dropped_entries, 2);
        assert_eq!(stats.dropped_senses, 3);
    }

    #[test]
    fn test_strips_excluded_sense_from_mixed_entry() {
        let corpus = Corpus::new(vec![Entry::new("kuusi", &[27, 31])]);
        let (filtered, _) = filter_categories(&corpus, &Taxonomy::kotus());
        assert_eq!(filtered.entries()[0].senses.len(), 1);
        assert_eq!(filtered.entries()[0].senses[0].category_code, 27);
    }

    #[test]
    fn test_entry_without_senses_dropped() {
        let corpus = Corpus::new(vec![Entry::new("aah", &[]), Entry::new("talo", &[1])]);
        let (filtered, stats) = filter_categories(&corpus, &Taxonomy::kotus());
        assert_eq!(headwords(&filtered), vec!["talo"]);
        assert_eq!(stats.dropped_entries, 1);
    }

    #[test]
    fn test_unassessed_codes_pass_through() {
        let corpus = Corpus::new(vec![Entry::new("hm", &[80])]);
        let (filtered, _) = filter_categories(&corpus, &Taxonomy::kotus());
        assert_eq!(filtered, corpus);
    }

    #[test]
    fn test_idempotent() {
        let corpus = Corpus::new(vec![
            Entry::new("talo", &[1, 99]),
            Entry::new("nopea", &[15]),
            Entry::new("ajaa", &[56]),
            Entry::new("hm", &[80]),
        ]);
        let taxonomy = Taxonomy::kotus();
        let (once, _) = filter_categories(&corpus, &taxonomy);
        let (twice, stats) = filter_categories(&once, &taxonomy);
        assert_eq!(once, twice);
        assert_eq!(stats, FilterStats::default());
    }
}
