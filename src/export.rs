// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Export Sink: serialize the accumulated records to a delimited text file.
//!
//! Called exactly once, at the end of the run, with the complete accumulator.
//! The artifact is UTF-8 with a BOM prefix, a title row, a header row in the
//! fixed schema order, and one always-quoted data row per record. An existing
//! file at the destination is overwritten.

use crate::errors::ExportError;
use crate::schema::{Field, Question};
use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;

/// Encoder options. Mirrors the configuration contract of the tabular
/// encoder: `decimal_separator` is carried for contract completeness even
/// though every field is exported as display text.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub field_separator: u8,
    pub quote_strings: bool,
    pub decimal_separator: char,
    pub show_labels: bool,
    pub show_title: bool,
    pub title: String,
    pub use_bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            field_separator: b',',
            quote_strings: true,
            decimal_separator: '.',
            show_labels: true,
            show_title: true,
            title: "Stackoverflow Questions".to_string(),
            use_bom: true,
        }
    }
}

/// Statistics from one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportStats {
    /// Data rows written (header/title rows not counted).
    pub rows_written: usize,
    pub bytes_written: u64,
}

/// Write all records to `dest`, overwriting any existing file.
pub fn export_records(
    records: &[Question],
    dest: &Path,
    cfg: &ExportConfig,
) -> Result<ExportStats, ExportError> {
    let mut buf: Vec<u8> = Vec::new();

    if cfg.use_bom {
        buf.extend_from_slice("\u{feff}".as_bytes());
    }
    if cfg.show_title {
        buf.extend_from_slice(cfg.title.as_bytes());
        buf.extend_from_slice(b"\n");
    }

    let mut wtr = WriterBuilder::new()
        .delimiter(cfg.field_separator)
        .quote_style(if cfg.quote_strings {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        })
        .from_writer(buf);

    if cfg.show_labels {
        wtr.write_record(Field::ALL.iter().map(|f| f.name()))?;
    }
    for question in records {
        wtr.write_record(question.values())?;
    }

    let buf = wtr
        .into_inner()
        .map_err(|e| ExportError::Encode(e.into_error().into()))?;

    std::fs::write(dest, &buf).map_err(|source| ExportError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(ExportStats {
        rows_written: records.len(),
        bytes_written: buf.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Question> {
        vec![
            Question {
                title: "How do I exit Vim?".into(),
                url: "https://stackoverflow.com/questions/11828270".into(),
                view_count: "2.9m".into(),
                vote_count: "5000".into(),
                answer_count: "50".into(),
                posted_at: "11 years ago".into(),
            },
            Question {
                title: "Commas, quotes, and \"escapes\"".into(),
                url: "https://stackoverflow.com/questions/1".into(),
                view_count: String::new(),
                vote_count: "0".into(),
                answer_count: "0".into(),
                posted_at: "2 mins ago".into(),
            },
        ]
    }

    #[test]
    fn test_artifact_has_bom_title_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let stats = export_records(&sample(), &dest, &ExportConfig::default()).unwrap();
        assert_eq!(stats.rows_written, 2);

        let raw = std::fs::read(&dest).unwrap();
        assert!(raw.starts_with("\u{feff}".as_bytes()));
        assert_eq!(stats.bytes_written, raw.len() as u64);

        let text = String::from_utf8(raw).unwrap();
        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some("Stackoverflow Questions"));
        let header = lines.next().unwrap();
        assert_eq!(
            header,
            "\"title\",\"url\",\"view_count\",\"vote_count\",\"answer_count\",\"posted_at\""
        );
    }

    #[test]
    fn test_round_trip_preserves_fields_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let records = sample();
        export_records(&records, &dest, &ExportConfig::default()).unwrap();

        // Parse the artifact back; skip the BOM and the title row the way any
        // consumer has to.
        let text = std::fs::read_to_string(&dest).unwrap();
        let body = text
            .trim_start_matches('\u{feff}')
            .split_once('\n')
            .unwrap()
            .1;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes());

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());
        for (row, q) in rows.iter().zip(&records) {
            assert_eq!(row.iter().collect::<Vec<_>>(), q.values());
        }
        // The comma-bearing title survived quoting
        assert_eq!(&rows[1][0], "Commas, quotes, and \"escapes\"");
    }

    #[test]
    fn test_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        std::fs::write(&dest, "stale contents").unwrap();

        export_records(&[], &dest, &ExportConfig::default()).unwrap();
        let text = std::fs::read_to_string(&dest).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.contains("Stackoverflow Questions"));
    }

    #[test]
    fn test_title_and_labels_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bare.csv");
        let cfg = ExportConfig {
            show_title: false,
            show_labels: false,
            use_bom: false,
            ..ExportConfig::default()
        };
        export_records(&sample(), &dest, &cfg).unwrap();
        let text = std::fs::read_to_string(&dest).unwrap();
        assert!(text.starts_with("\"How do I exit Vim?\""));
    }

    #[test]
    fn test_unwritable_destination_is_a_write_error() {
        let err = export_records(
            &sample(),
            Path::new("/nonexistent-dir/out.csv"),
            &ExportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
