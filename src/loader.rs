// CSV ingestion: the raw review export goes in, a normalized `Dataset`
// comes out. Malformed rows are skipped and tallied, never fatal; the only
// hard failures are opening and reading the file itself.
use crate::types::{Dataset, RawRow, Review};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// What happened during a load, for the console diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub missing_ratings: usize,
    pub missing_text: usize,
}

pub fn load(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport), LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_from_reader(file)
}

/// Load from any reader. Extra columns are ignored, ragged rows tolerated;
/// a row that still fails to deserialize is counted and skipped.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport), LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut rows: Vec<Review> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                report.skipped_rows += 1;
                debug!(row = report.total_rows, %err, "skipping unreadable row");
                continue;
            }
        };
        let review = Review::from_raw(raw);
        if review.rating.is_none() {
            report.missing_ratings += 1;
        }
        if review.text.is_none() {
            report.missing_text += 1;
        }
        rows.push(review);
    }

    report.loaded_rows = rows.len();
    info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "dataset loaded"
    );
    Ok((Dataset::new(rows), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
id,name,reviews.date,reviews.rating,reviews.text,reviews.title,reviews.username
1,Widget,2016-10-09T00:00:00.000Z,5,Love it,Great,jo
2,Widget,2016-11-01,not a number,,Meh,sam
3,Widget Pro,2016-12-05,3,Decent enough,OK,kim
";

    #[test]
    fn loads_rows_and_ignores_extra_columns() {
        let (data, report) = load_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(report.missing_ratings, 1);
        assert_eq!(report.missing_text, 1);
        assert_eq!(data.len(), 3);

        let first = &data.rows()[0];
        assert_eq!(first.product.as_deref(), Some("Widget"));
        assert_eq!(first.rating, Some(5.0));
        assert_eq!(first.year_month(), Some("2016-10"));

        let second = &data.rows()[1];
        assert_eq!(second.rating, None);
        assert_eq!(second.text, None);
    }

    #[test]
    fn missing_file_is_a_typed_error() {
        let err = load("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn empty_input_yields_an_empty_dataset() {
        let header_only = "name,reviews.date,reviews.rating,reviews.text,reviews.title,reviews.username\n";
        let (data, report) = load_from_reader(header_only.as_bytes()).unwrap();
        assert!(data.is_empty());
        assert_eq!(report.total_rows, 0);
    }
}
