//! Dated score files: one `<label>,<headline>` line per scored headline.
//!
//! Headlines are written verbatim. A headline containing a comma still
//! round-trips because parsing splits at the first comma, but labels must
//! not contain one and embedded newlines are not escaped.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::OutputError;
use crate::label::{Label, ScoredHeadline};

/// `headline_scores_<source>_<YYYY_MM_DD>.txt`
pub fn output_file_name(source: &str, date: NaiveDate) -> String {
    format!("headline_scores_{source}_{}.txt", date.format("%Y_%m_%d"))
}

/// Render scored headlines in file order.
pub fn format_scores(results: &[ScoredHeadline]) -> String {
    results
        .iter()
        .map(|r| format!("{},{}\n", r.label, r.headline))
        .collect()
}

/// Write a score file into `dir`, replacing any file of the same name.
///
/// Returns the path written.
pub fn write_scores(
    dir: &Path,
    source: &str,
    date: NaiveDate,
    results: &[ScoredHeadline],
) -> Result<PathBuf, OutputError> {
    let path = dir.join(output_file_name(source, date));
    std::fs::write(&path, format_scores(results)).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    info!(count = results.len(), path = %path.display(), "wrote scores");
    Ok(path)
}

/// Parse one `<label>,<headline>` line.
///
/// Labels are read back as text; the file format does not record whether a
/// class was numeric.
pub fn parse_score_line(line: &str) -> Option<ScoredHeadline> {
    let (label, headline) = line.split_once(',')?;
    Some(ScoredHeadline {
        label: Label::from(label),
        headline: headline.to_string(),
    })
}

/// Read a score file back into `(label, headline)` pairs.
pub fn read_scores(path: &Path) -> Result<Vec<ScoredHeadline>, OutputError> {
    let text = std::fs::read_to_string(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            parse_score_line(line).ok_or_else(|| OutputError::Malformed {
                line: i + 1,
                content: line.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(label: &str, headline: &str) -> ScoredHeadline {
        ScoredHeadline {
            label: Label::from(label),
            headline: headline.to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn file_name_uses_underscored_date() {
        assert_eq!(
            output_file_name("nyt", date()),
            "headline_scores_nyt_2025_03_07.txt"
        );
    }

    #[test]
    fn lines_are_label_comma_headline() {
        let text = format_scores(&[
            scored("Optimistic", "Stocks rally"),
            scored("Pessimistic", "Markets fall"),
        ]);
        assert_eq!(text, "Optimistic,Stocks rally\nPessimistic,Markets fall\n");
    }

    #[test]
    fn integer_labels_written_bare() {
        let text = format_scores(&[ScoredHeadline {
            label: Label::Int(1),
            headline: "Jobs report beats forecasts".into(),
        }]);
        assert_eq!(text, "1,Jobs report beats forecasts\n");
    }

    #[test]
    fn write_then_read_recovers_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![
            scored("Optimistic", "Stocks rally"),
            scored("Neutral", "Fed meets Tuesday"),
            scored("Pessimistic", "Markets fall"),
        ];

        let path = write_scores(dir.path(), "nyt", date(), &results).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "headline_scores_nyt_2025_03_07.txt"
        );

        let back = read_scores(&path).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = vec![scored("a", "one"), scored("b", "two"), scored("c", "three")];
        let second = vec![scored("z", "only")];

        write_scores(dir.path(), "wsj", date(), &first).unwrap();
        let path = write_scores(dir.path(), "wsj", date(), &second).unwrap();

        assert_eq!(read_scores(&path).unwrap(), second);
    }

    #[test]
    fn empty_results_write_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scores(dir.path(), "ap", date(), &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(read_scores(&path).unwrap().is_empty());
    }

    #[test]
    fn parse_splits_at_first_comma() {
        let parsed = parse_score_line("Neutral,Oil, gold slip").unwrap();
        assert_eq!(parsed, scored("Neutral", "Oil, gold slip"));
    }

    #[test]
    fn line_without_comma_is_malformed() {
        assert!(parse_score_line("no separator").is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "Neutral,ok\nbroken\n").unwrap();
        assert!(matches!(
            read_scores(&path),
            Err(OutputError::Malformed { line: 2, .. })
        ));
    }
}
