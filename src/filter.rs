// The filtering/summarization engine.
//
// Filtering is a single pass: each active option contributes one named
// predicate, every predicate is evaluated for every row, and a row is kept
// only when no predicate fires. Per-reason tallies are independent: a row
// firing two reasons counts in both tallies but only once among the dropped.
use crate::types::{Dataset, Review};
use crate::util::mean;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// An immutable set of optional filter parameters. Any subset may be
/// present; an absent option contributes no predicate. An empty
/// `exclude_words` list counts as absent.
///
/// The engine does not validate combinations: `min_rating > max_rating` or
/// an inverted month range is accepted and simply yields a (possibly empty)
/// result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    /// Inclusive lower rating bound.
    pub min_rating: Option<f64>,
    /// Inclusive upper rating bound.
    pub max_rating: Option<f64>,
    /// Minimum token count of the review text, split on single spaces.
    pub min_word_count: Option<usize>,
    /// Inclusive lower bound on the `YYYY-MM` date prefix.
    pub start_month: Option<String>,
    /// Inclusive upper bound on the `YYYY-MM` date prefix.
    pub end_month: Option<String>,
    /// Case-insensitive substrings; a review is dropped if its text
    /// contains any of them.
    pub exclude_words: Vec<String>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.min_rating.is_none()
            && self.max_rating.is_none()
            && self.min_word_count.is_none()
            && self.start_month.is_none()
            && self.end_month.is_none()
            && self.exclude_words.is_empty()
    }
}

/// A named filter criterion. Each active option maps to exactly one reason;
/// the enum order is the build (and reporting) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DropReason {
    RatingBelowMin,
    RatingAboveMax,
    TextTooShort,
    ContainsExcludedWords,
    BeforeStartMonth,
    AfterEndMonth,
}

impl DropReason {
    /// Stable human-facing label, used in reports and exports.
    pub fn label(&self) -> &'static str {
        match self {
            DropReason::RatingBelowMin => "Rating Below Min",
            DropReason::RatingAboveMax => "Rating Above Max",
            DropReason::TextTooShort => "Text Too Short",
            DropReason::ContainsExcludedWords => "Contains Excluded Words",
            DropReason::BeforeStartMonth => "Before Start Month",
            DropReason::AfterEndMonth => "After End Month",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `true` means "this reason marks the row for removal".
pub type ReviewPredicate = Box<dyn Fn(&Review) -> bool>;

/// Build the ordered `(reason, predicate)` list for a configuration.
///
/// Every predicate treats a missing or unparseable value in the field it
/// inspects as firing: rows are conservatively dropped, never silently
/// kept, and no predicate ever errors. With no options present the list is
/// empty and every row is kept.
pub fn build_predicates(config: &FilterConfig) -> Vec<(DropReason, ReviewPredicate)> {
    let mut predicates: Vec<(DropReason, ReviewPredicate)> = Vec::new();

    if let Some(min) = config.min_rating {
        predicates.push((
            DropReason::RatingBelowMin,
            Box::new(move |r| r.rating.map_or(true, |v| v < min)),
        ));
    }

    if let Some(max) = config.max_rating {
        predicates.push((
            DropReason::RatingAboveMax,
            Box::new(move |r| r.rating.map_or(true, |v| v > max)),
        ));
    }

    if let Some(min_words) = config.min_word_count {
        predicates.push((
            DropReason::TextTooShort,
            Box::new(move |r| r.word_count().map_or(true, |n| n < min_words)),
        ));
    }

    if !config.exclude_words.is_empty() {
        let needles: Vec<String> = config
            .exclude_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        // Known quirk, preserved for compatibility with the source
        // behavior: a review with no text at all is dropped here even
        // though no excluded word matched.
        predicates.push((
            DropReason::ContainsExcludedWords,
            Box::new(move |r| match r.text.as_deref() {
                Some(text) => {
                    let lowered = text.to_lowercase();
                    needles.iter().any(|w| lowered.contains(w.as_str()))
                }
                None => true,
            }),
        ));
    }

    if let Some(start) = config.start_month.clone() {
        predicates.push((
            DropReason::BeforeStartMonth,
            Box::new(move |r| r.year_month().map_or(true, |ym| ym < start.as_str())),
        ));
    }

    if let Some(end) = config.end_month.clone() {
        predicates.push((
            DropReason::AfterEndMonth,
            Box::new(move |r| r.year_month().map_or(true, |ym| ym > end.as_str())),
        ));
    }

    predicates
}

/// How many rows matched one reason. Tallies are independent per reason:
/// the same row may appear in several of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: DropReason,
    pub count: usize,
}

/// Aggregate outcome of one filtering pass.
///
/// Averages are over parseable ratings only and are absent (not zero)
/// when there is nothing to average. `reason_counts` lists every active
/// reason in build order, zero tallies included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    pub total_reviews: usize,
    pub filtered_reviews: usize,
    pub dropped_reviews: usize,
    pub percent_filtered: f64,
    pub avg_rating_before: Option<f64>,
    pub avg_rating_after: Option<f64>,
    pub reason_counts: Vec<ReasonCount>,
}

impl FilterSummary {
    fn empty() -> Self {
        FilterSummary {
            total_reviews: 0,
            filtered_reviews: 0,
            dropped_reviews: 0,
            percent_filtered: 0.0,
            avg_rating_before: None,
            avg_rating_after: None,
            reason_counts: Vec::new(),
        }
    }
}

/// Apply a filter configuration to a dataset.
///
/// Returns the surviving rows and the summary; the input is never mutated
/// and nothing beyond the return values is produced. An empty dataset
/// short-circuits to an all-zero/absent summary.
pub fn apply(data: &Dataset, config: &FilterConfig) -> (Dataset, FilterSummary) {
    if data.is_empty() {
        return (data.clone(), FilterSummary::empty());
    }

    let predicates = build_predicates(config);
    let mut tallies = vec![0usize; predicates.len()];
    let mut kept: Vec<Review> = Vec::with_capacity(data.len());

    for row in data.rows() {
        let mut drop = false;
        for (i, (_, fires)) in predicates.iter().enumerate() {
            if fires(row) {
                tallies[i] += 1;
                drop = true;
            }
        }
        if !drop {
            kept.push(row.clone());
        }
    }

    let total_reviews = data.len();
    let filtered_reviews = kept.len();
    let dropped_reviews = total_reviews - filtered_reviews;
    let percent_filtered = dropped_reviews as f64 / total_reviews as f64 * 100.0;

    let avg_rating_before = mean(data.ratings());
    let avg_rating_after = mean(kept.iter().filter_map(|r| r.rating));

    let reason_counts = predicates
        .iter()
        .zip(tallies)
        .map(|((reason, _), count)| ReasonCount {
            reason: *reason,
            count,
        })
        .collect();

    debug!(
        total = total_reviews,
        kept = filtered_reviews,
        dropped = dropped_reviews,
        "filter pass complete"
    );

    (
        Dataset::new(kept),
        FilterSummary {
            total_reviews,
            filtered_reviews,
            dropped_reviews,
            percent_filtered,
            avg_rating_before,
            avg_rating_after,
            reason_counts,
        },
    )
}
