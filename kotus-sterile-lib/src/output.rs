// Threshold report formatting and file naming.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::persist;
use crate::types::*;

/// First line of every report.
pub fn header(threshold: usize) -> String {
    format!("N→V derivations by {threshold} common characters:")
}

/// One `noun → verb` line.
pub fn pair_line(pair: &DerivationPair) -> String {
    format!("{} → {}", pair.noun, pair.verb)
}

/// Full report text: header, then one line per pair in discovery order.
pub fn to_report_text(report: &ThresholdReport) -> String {
    let mut text = header(report.threshold);
    text.push('\n');
    for pair in &report.pairs {
        text.push_str(&pair_line(pair));
        text.push('\n');
    }
    text
}

pub fn report_path(out_dir: &Path, threshold: usize) -> PathBuf {
    out_dir.join(format!("output-{threshold}.txt"))
}

/// Write a report into a temp file in `out_dir`; the report only appears
/// under its own name once the returned file is committed.
pub fn stage_report(out_dir: &Path, report: &ThresholdReport) -> Result<persist::Staged> {
    let path = report_path(out_dir, report.threshold);
    persist::stage(&path, to_report_text(report).as_bytes())
}

/// Parse report text back into pairs, skipping the header.
pub fn parse_report(text: &str) -> Vec<DerivationPair> {
    text.lines()
        .skip(1)
        .filter_map(|line| line.split_once(" → "))
        .map(|(noun, verb)| DerivationPair {
            noun: noun.to_string(),
            verb: verb.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_report() {
        let report = ThresholdReport {
            threshold: 12,
            pairs: vec![],
        };
        assert_eq!(
            to_report_text(&report),
            "N→V derivations by 12 common characters:\n"
        );
    }

    #[test]
    fn test_report_lines_in_order() {
        let report = ThresholdReport {
            threshold: 5,
            pairs: vec![
                DerivationPair {
                    noun: "lukija".to_string(),
                    verb: "lukea".to_string(),
                },
                DerivationPair {
                    noun: "ajo".to_string(),
                    verb: "ajaa".to_string(),
                },
            ],
        };
        let text = to_report_text(&report);
        assert_eq!(
            text,
            "N→V derivations by 5 common characters:\nlukija → lukea\najo → ajaa\n"
        );
        assert_eq!(parse_report(&text), report.pairs);
    }

    #[test]
    fn test_staged_report_appears_on_commit() {
        let dir = tempfile::tempdir().unwrap();
        let report = ThresholdReport {
            threshold: 3,
            pairs: vec![DerivationPair {
                noun: "lukija".to_string(),
                verb: "lukea".to_string(),
            }],
        };
        let staged = stage_report(dir.path(), &report).unwrap();
        let path = report_path(dir.path(), 3);
        assert!(!path.exists());
        assert_eq!(staged.commit().unwrap(), path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "N→V derivations by 3 common characters:\nlukija → lukea\n"
        );
    }

    #[test]
    fn test_report_path() {
        assert_eq!(
            report_path(Path::new("out"), 7),
            Path::new("out").join("output-7.txt")
        );
    }
}
