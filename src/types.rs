use crate::util::{clean_string, parse_date_safe, parse_f64_safe};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the raw review export, exactly as the CSV names its columns.
///
/// Every field is optional; the export routinely has blank cells and the
/// loader tolerates all of them.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "name")]
    pub name: Option<String>,
    #[serde(rename = "reviews.date")]
    pub date: Option<String>,
    #[serde(rename = "reviews.rating")]
    pub rating: Option<String>,
    #[serde(rename = "reviews.text")]
    pub text: Option<String>,
    #[serde(rename = "reviews.title")]
    pub title: Option<String>,
    #[serde(rename = "reviews.username")]
    pub username: Option<String>,
}

/// A normalized review record.
///
/// Strings are trimmed with blanks mapped to `None`, and the rating is
/// pre-parsed: a missing or non-numeric rating is simply absent. Duplicates
/// are valid domain data (one user may post several reviews).
///
/// Serialization uses the raw export's column names so a filtered dataset
/// written back to CSV matches the input format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    #[serde(rename = "name")]
    pub product: Option<String>,
    #[serde(rename = "reviews.date")]
    pub date: Option<String>,
    #[serde(rename = "reviews.rating")]
    pub rating: Option<f64>,
    #[serde(rename = "reviews.text")]
    pub text: Option<String>,
    #[serde(rename = "reviews.title")]
    pub title: Option<String>,
    #[serde(rename = "reviews.username")]
    pub username: Option<String>,
}

impl Review {
    pub fn from_raw(raw: RawRow) -> Self {
        Review {
            product: clean_string(raw.name),
            date: clean_string(raw.date),
            rating: parse_f64_safe(raw.rating.as_deref()),
            text: clean_string(raw.text),
            title: clean_string(raw.title),
            username: clean_string(raw.username),
        }
    }

    /// The `YYYY-MM` prefix of the review date: the first seven characters,
    /// or the whole string when it is shorter. Month-bound comparisons are
    /// string-lexicographic, not calendar-aware.
    pub fn year_month(&self) -> Option<&str> {
        self.date.as_deref().map(|d| d.get(..7).unwrap_or(d))
    }

    /// Token count of the review text, split on single spaces.
    ///
    /// The empty string counts as one token and consecutive spaces yield
    /// empty tokens; word-count filtering depends on exactly these
    /// semantics.
    pub fn word_count(&self) -> Option<usize> {
        self.text.as_deref().map(|t| t.split(' ').count())
    }
}

/// An immutable, in-memory review table.
///
/// The dataset is loaded once per session and shared read-only; filtering
/// and selection derive new `Dataset` values and never mutate the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Review>,
}

impl Dataset {
    pub fn new(rows: Vec<Review>) -> Self {
        Dataset { rows }
    }

    pub fn rows(&self) -> &[Review] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All parseable ratings, in row order. Rows with an absent rating are
    /// skipped, never treated as zero.
    pub fn ratings(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.rating)
    }

    /// Exact whole-string, case-sensitive product lookup. `"Widget"` does
    /// not match `"Widget Pro"`; rows with an absent product name match
    /// nothing. No match yields an empty dataset, not an error.
    pub fn select_product(&self, name: &str) -> Dataset {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.product.as_deref() == Some(name))
            .cloned()
            .collect();
        Dataset::new(rows)
    }

    /// Most recent parseable review date, used to anchor relative
    /// time-period presets.
    pub fn latest_review_date(&self) -> Option<NaiveDate> {
        self.rows
            .iter()
            .filter_map(|r| parse_date_safe(r.date.as_deref()))
            .max()
    }
}

impl FromIterator<Review> for Dataset {
    fn from_iter<I: IntoIterator<Item = Review>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}
