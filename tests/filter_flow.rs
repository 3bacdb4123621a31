// End-to-end flow over an in-memory CSV: load, select a product, filter,
// and report, the same path the dashboard shell drives.
use pretty_assertions::assert_eq;
use review_dashboard::filter::{self, DropReason, FilterConfig};
use review_dashboard::{loader, report, viz};

const SAMPLE: &str = "\
name,reviews.date,reviews.rating,reviews.text,reviews.title,reviews.username
Kindle Paperwhite,2016-06-10T00:00:00.000Z,5,Crisp screen and a great battery,Love it,ana
Kindle Paperwhite,2016-07-02,1,junk,Bad,bob
Kindle Paperwhite,2016-08-15,,Fine for the price I suppose,OK,cam
Kindle Paperwhite,2015-12-30,3,Decent reader overall honestly,Solid,dee
Kindle Paperwhite Pro,2016-06-11,4,Different product entirely,Other,eve
";

#[test]
fn select_filter_and_report_end_to_end() {
    let (data, load_report) = loader::load_from_reader(SAMPLE.as_bytes()).unwrap();
    assert_eq!(load_report.loaded_rows, 5);
    assert_eq!(load_report.missing_ratings, 1);

    // Exact match: the "Pro" variant stays out.
    let selection = data.select_product("Kindle Paperwhite");
    assert_eq!(selection.len(), 4);

    let config = FilterConfig {
        min_rating: Some(2.0),
        min_word_count: Some(3),
        start_month: Some("2016-01".to_string()),
        ..FilterConfig::default()
    };
    let (filtered, summary) = filter::apply(&selection, &config);

    // Only the June 5-star review clears every predicate: the 1-star and
    // the unrated rows fail the rating bound, "junk" is too short, and the
    // December 2015 review predates the window.
    assert_eq!(summary.total_reviews, 4);
    assert_eq!(summary.filtered_reviews, 1);
    assert_eq!(summary.dropped_reviews, 3);
    assert_eq!(summary.percent_filtered, 75.0);
    assert_eq!(summary.avg_rating_before, Some(3.0));
    assert_eq!(summary.avg_rating_after, Some(5.0));

    let counts: Vec<(DropReason, usize)> = summary
        .reason_counts
        .iter()
        .map(|rc| (rc.reason, rc.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            (DropReason::RatingBelowMin, 2),
            (DropReason::TextTooShort, 1),
            (DropReason::BeforeStartMonth, 1),
        ]
    );

    // Reapplying the same configuration is a no-op.
    let (again, second) = filter::apply(&filtered, &config);
    assert_eq!(again, filtered);
    assert_eq!(second.dropped_reviews, 0);

    // Reporter output: stable labels, independent tallies, nonzero pie.
    let rows = report::summary_rows(&summary);
    assert_eq!(rows[0].metric, "Total Reviews");
    assert_eq!(rows[0].value, "4");
    assert_eq!(rows[3].value, "75.00%");

    let slices = report::pie_slices(&summary);
    assert_eq!(slices.len(), 3);
    assert_eq!(slices[0].share, "50.0%");

    // Renderers consume the filtered dataset without complaint.
    let dist = viz::rating_distribution(&filtered);
    assert_eq!(dist.len(), 1);
    assert_eq!(dist[0].rating, "5");
    let timeline = viz::review_timeline(&filtered);
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].month, "2016-06");
}

#[test]
fn no_filters_is_the_identity_even_after_loading() {
    let (data, _) = loader::load_from_reader(SAMPLE.as_bytes()).unwrap();
    let selection = data.select_product("Kindle Paperwhite");
    let (filtered, summary) = filter::apply(&selection, &FilterConfig::default());
    assert_eq!(filtered, selection);
    assert_eq!(summary.dropped_reviews, 0);
    assert!(summary.reason_counts.is_empty());
    assert!(report::pie_slices(&summary).is_empty());
}
