// Visualization renderers: thin consumers of the engine's output that turn
// a (possibly filtered) dataset into table-row artifacts: a rating
// distribution bar chart, a monthly rating timeline, and a word-frequency
// "word cloud". All of them render an empty dataset as an empty row set.
use crate::types::Dataset;
use crate::util::format_number;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use tabled::Tabled;

/// Width of the proportional text bar in the rating distribution.
const BAR_WIDTH: usize = 30;

/// Default cap on word-cloud entries.
pub const DEFAULT_MAX_WORDS: usize = 150;

// Common English words that carry no signal in review text.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "get", "got", "had", "has", "have",
        "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
        "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
        "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
        "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so", "some",
        "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
        "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
        "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// One bar of the rating distribution chart.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RatingBucketRow {
    #[serde(rename = "Rating")]
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "Reviews")]
    #[tabled(rename = "Reviews")]
    pub count: usize,
    #[serde(rename = "Distribution")]
    #[tabled(rename = "Distribution")]
    pub bar: String,
}

/// Review count per distinct parseable rating, ascending, with a bar
/// proportional to the most common rating.
pub fn rating_distribution(data: &Dataset) -> Vec<RatingBucketRow> {
    let mut ratings: Vec<f64> = data.ratings().collect();
    if ratings.is_empty() {
        return Vec::new();
    }
    ratings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut buckets: Vec<(f64, usize)> = Vec::new();
    for rating in ratings {
        match buckets.last_mut() {
            Some((value, count)) if *value == rating => *count += 1,
            _ => buckets.push((rating, 1)),
        }
    }

    let tallest = buckets.iter().map(|(_, c)| *c).max().unwrap_or(1);
    buckets
        .into_iter()
        .map(|(rating, count)| {
            let width = ((count as f64 / tallest as f64) * BAR_WIDTH as f64).round() as usize;
            RatingBucketRow {
                rating: format!("{}", rating),
                count,
                bar: "#".repeat(width.max(1)),
            }
        })
        .collect()
}

/// One month of the rating timeline.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct MonthlyRatingRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Avg Rating")]
    #[tabled(rename = "Avg Rating")]
    pub avg_rating: String,
    #[serde(rename = "Reviews")]
    #[tabled(rename = "Reviews")]
    pub count: usize,
}

/// Mean rating per `YYYY-MM` month, ascending. Only rows carrying both a
/// date and a parseable rating contribute.
pub fn review_timeline(data: &Dataset) -> Vec<MonthlyRatingRow> {
    let mut monthly: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in data.rows() {
        if let (Some(month), Some(rating)) = (row.year_month(), row.rating) {
            let entry = monthly.entry(month.to_string()).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }
    }
    monthly
        .into_iter()
        .map(|(month, (sum, count))| MonthlyRatingRow {
            month,
            avg_rating: format_number(sum / count as f64, 2),
            count,
        })
        .collect()
}

/// One entry of the word-frequency table standing in for the word cloud.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct WordWeightRow {
    #[serde(rename = "Word")]
    #[tabled(rename = "Word")]
    pub word: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// Word frequencies over all review text: lowercased, punctuation-trimmed
/// tokens with stopwords and single letters removed, most frequent first
/// (ties alphabetical), capped at `max_words`.
pub fn word_cloud(
    data: &Dataset,
    extra_stopwords: &[&str],
    max_words: usize,
) -> Vec<WordWeightRow> {
    let extra: HashSet<String> = extra_stopwords.iter().map(|w| w.to_lowercase()).collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in data.rows().iter().filter_map(|r| r.text.as_deref()) {
        for token in text.split_whitespace() {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.chars().count() < 2 {
                continue;
            }
            if STOPWORDS.contains(word.as_str()) || extra.contains(&word) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
        .into_iter()
        .take(max_words)
        .map(|(word, count)| WordWeightRow { word, count })
        .collect()
}
