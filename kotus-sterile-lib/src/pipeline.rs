// End-to-end run: load → filter → persist → passes → residue.
//
// Every path is explicit; nothing here changes the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::Corpus;
use crate::derivation::{Matcher, Thresholds};
use crate::error::{Result, SterileError};
use crate::filter::{filter_categories, FilterStats};
use crate::output;
use crate::persist;
use crate::taxonomy::Taxonomy;
use crate::types::{PassSummary, RunSummary};

const FILTERED_SUFFIX: &str = "_cleaned.xml";
const RESIDUE_SUFFIX: &str = "_sterile.xml";

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: PathBuf,
    /// Defaults to the directory holding `source`.
    pub out_dir: Option<PathBuf>,
    pub taxonomy: Taxonomy,
    pub thresholds: Thresholds,
    pub allow_self_match: bool,
    /// Treat `source` as an already filtered corpus.
    pub skip_filter: bool,
}

impl RunConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            out_dir: None,
            taxonomy: Taxonomy::kotus(),
            thresholds: Thresholds::default(),
            allow_self_match: true,
            skip_filter: false,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.clone(),
            None => persist::parent_dir(&self.source).to_path_buf(),
        }
    }

    pub fn filtered_path(&self) -> PathBuf {
        self.out_dir()
            .join(format!("{}{FILTERED_SUFFIX}", source_stem(&self.source)))
    }

    pub fn residue_path(&self) -> PathBuf {
        self.out_dir()
            .join(format!("{}{RESIDUE_SUFFIX}", source_stem(&self.source)))
    }
}

/// File stem with any earlier run suffix removed, so that restarting from
/// `x_cleaned.xml` still writes `x_sterile.xml`.
fn source_stem(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    let suffix = FILTERED_SUFFIX.trim_end_matches(".xml");
    match stem.strip_suffix(suffix) {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => stem,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Run the filter and every derivation pass, persisting each artifact as
/// soon as its stage completes.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.taxonomy.validate()?;
    if !config.skip_filter && same_file(&config.filtered_path(), &config.source) {
        return Err(SterileError::SourceOverwrite {
            path: config.source.clone(),
        });
    }

    let out_dir = config.out_dir();
    let raw = Corpus::load(&config.source)?;
    let entries_read = raw.len();

    let (mut corpus, filtered_corpus, dropped) = if config.skip_filter {
        (raw, None, FilterStats::default())
    } else {
        let (filtered, stats) = filter_categories(&raw, &config.taxonomy);
        let path = config.filtered_path();
        filtered.save(&path)?;
        (filtered, Some(path), stats)
    };
    let entries_filtered = corpus.len();

    let residue_corpus = config.residue_path();
    let matcher = Matcher::new(&config.taxonomy).allow_self_match(config.allow_self_match);
    let mut passes = Vec::with_capacity(config.thresholds.len());

    for threshold in config.thresholds.iter() {
        let span = tracing::info_span!("pass", threshold);
        let _enter = span.enter();
        tracing::info!("comparing the first {threshold} characters of each noun and verb");

        let before = corpus.len();
        let report = matcher.run_pass(&mut corpus, threshold);
        // Nothing from this pass lands until both files are fully written.
        // The corpus goes first so a failed rename never leaves a report
        // for a pass whose corpus was not saved.
        let staged_report = output::stage_report(&out_dir, &report)?;
        let staged_corpus = corpus.stage(&residue_corpus)?;
        staged_corpus.commit()?;
        let report_path = staged_report.commit()?;

        passes.push(PassSummary {
            threshold,
            matches: report.pairs.len(),
            removed: before - corpus.len(),
            remaining: corpus.len(),
            report: report_path,
        });
    }

    let sterile = corpus.residue_counts(&config.taxonomy);
    tracing::info!(
        nouns = sterile.nouns,
        verbs = sterile.verbs,
        unassessed = sterile.unassessed,
        "done"
    );

    Ok(RunSummary {
        source: config.source.clone(),
        entries_read,
        entries_filtered,
        dropped_senses: dropped.dropped_senses,
        dropped_entries: dropped.dropped_entries,
        filtered_corpus,
        residue_corpus,
        passes,
        sterile,
    })
}
