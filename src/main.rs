// Entry point and the interactive dashboard shell.
//
// The shell is thin glue around the engine: it owns the session state
// (selected product, current filter configuration, cached unfiltered
// charts), prompts for filter values, and delegates all computation to the
// library. Every operation takes the dataset handle explicitly; there is no
// process-wide state.
use review_dashboard::filter::{self, FilterConfig};
use review_dashboard::types::Dataset;
use review_dashboard::util::{
    format_int, month_before, parse_f64_safe, parse_usize_safe, year_month_of,
};
use review_dashboard::viz::{self, MonthlyRatingRow, RatingBucketRow, WordWeightRow};
use review_dashboard::{loader, output, report};
use std::io::{self, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const FILTERED_CSV: &str = "filtered_reviews.csv";
const SUMMARY_JSON: &str = "filter_summary.json";

/// Unfiltered chart artifacts for one product. Recomputed only when the
/// selected product changes, so adjusting filters stays cheap.
struct UnfilteredCharts {
    ratings: Vec<RatingBucketRow>,
    timeline: Vec<MonthlyRatingRow>,
    cloud: Vec<WordWeightRow>,
}

struct Session {
    data: Dataset,
    product: String,
    selection: Dataset,
    config: FilterConfig,
    unfiltered: Option<UnfilteredCharts>,
}

/// Read a single trimmed line of input after printing a prompt.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Prompt for a product name until it matches at least one review.
///
/// Matching is exact and case-sensitive against the dataset's product
/// column; a miss prints a message and asks again.
fn select_product(data: &Dataset) -> (String, Dataset) {
    loop {
        let name = read_line("Enter Product Name: ");
        if name.is_empty() {
            println!("Enter a product name to start.\n");
            continue;
        }
        let selection = data.select_product(&name);
        if selection.is_empty() {
            println!("No matching product found.\n");
            continue;
        }
        println!("Loaded {} reviews\n", format_int(selection.len()));
        return (name, selection);
    }
}

/// Show the unfiltered charts, computing and caching them on first view.
fn show_unfiltered(session: &mut Session) {
    if session.unfiltered.is_none() {
        debug!(product = %session.product, "rendering unfiltered charts");
        session.unfiltered = Some(UnfilteredCharts {
            ratings: viz::rating_distribution(&session.selection),
            timeline: viz::review_timeline(&session.selection),
            cloud: viz::word_cloud(&session.selection, &[], viz::DEFAULT_MAX_WORDS),
        });
    }
    if let Some(charts) = &session.unfiltered {
        println!("Unfiltered Reviews: {}\n", session.product);
        output::preview_table("Number of Reviews by Rating", None, &charts.ratings, 10);
        output::preview_table(
            "Average Review Rating by Month",
            None,
            &charts.timeline,
            12,
        );
        output::preview_table("Most Common Words", None, &charts.cloud, 20);
    }
}

/// Prompt for the month range, either via a preset anchored at the most
/// recent review date or as explicit `YYYY-MM` bounds.
fn prompt_month_range(session: &Session) -> (Option<String>, Option<String>) {
    println!("Time Period:");
    println!("[1] All time");
    println!("[2] Last 6 months");
    println!("[3] Last year");
    println!("[4] Custom range");
    let choice = read_line("Enter choice: ");
    match choice.as_str() {
        "2" | "3" => {
            let Some(latest) = session.selection.latest_review_date() else {
                println!("No parseable review dates; using all time.");
                return (None, None);
            };
            let months = if choice == "2" { 6 } else { 12 };
            let start = month_before(latest, months);
            let end = year_month_of(latest);
            println!("Using {} through {}.", start, end);
            (Some(start), Some(end))
        }
        "4" => {
            let start = read_line("Start month (YYYY-MM, blank for none): ");
            let end = read_line("End month (YYYY-MM, blank for none): ");
            (
                (!start.is_empty()).then_some(start),
                (!end.is_empty()).then_some(end),
            )
        }
        _ => (None, None),
    }
}

/// Walk through every filter option; a blank answer leaves an option
/// absent. The configuration is rebuilt from scratch each time so stale
/// values never linger.
fn adjust_filters(session: &mut Session) {
    println!("Adjust filters (blank to leave an option off).\n");
    let min_rating = parse_f64_safe(Some(read_line("Min rating (1-5): ").as_str()));
    let max_rating = parse_f64_safe(Some(read_line("Max rating (1-5): ").as_str()));
    let min_word_count = parse_usize_safe(Some(read_line("Min word count: ").as_str()));
    let (start_month, end_month) = prompt_month_range(session);
    let words = read_line("Excluded words (comma separated): ");
    let exclude_words: Vec<String> = words
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    session.config = FilterConfig {
        min_rating,
        max_rating,
        min_word_count,
        start_month,
        end_month,
        exclude_words,
    };
    println!("\nCurrent filters: {:?}\n", session.config);
}

/// Run the engine over the selected product and show the comparison:
/// summary table, reason breakdown, filtered charts, file exports.
fn apply_filters(session: &Session) {
    if session.config.is_empty() {
        println!("No filters set; showing unfiltered data. Use option 2 first.\n");
    }
    let (filtered, summary) = filter::apply(&session.selection, &session.config);

    println!("Filtered Reviews: {}\n", session.product);
    output::preview_table(
        "Filter Summary",
        None,
        &report::summary_rows(&summary),
        usize::MAX,
    );
    output::preview_table(
        "Filter Reason Counts",
        Some("rows matching each reason, counted independently"),
        &report::reason_rows(&summary),
        usize::MAX,
    );

    let slices = report::pie_slices(&summary);
    if slices.is_empty() {
        println!("No reviews were filtered out.\n");
    } else {
        output::preview_table(
            "Reasons Reviews Were Filtered Out",
            None,
            &slices,
            usize::MAX,
        );
    }

    output::preview_table(
        "Number of Reviews by Rating",
        Some("filtered"),
        &viz::rating_distribution(&filtered),
        10,
    );
    output::preview_table(
        "Average Review Rating by Month",
        Some("filtered"),
        &viz::review_timeline(&filtered),
        12,
    );
    output::preview_table(
        "Most Common Words",
        Some("filtered"),
        &viz::word_cloud(&filtered, &[], viz::DEFAULT_MAX_WORDS),
        20,
    );

    if let Err(e) = output::write_csv(FILTERED_CSV, filtered.rows()) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_json(SUMMARY_JSON, &report::export(&summary)) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "(Filtered rows exported to {}, summary to {})\n",
        FILTERED_CSV, SUMMARY_JSON
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "data.csv".to_string());
    let (data, load_report) = match loader::load(&path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    };
    println!(
        "Processing dataset... ({} rows loaded, {} skipped)",
        format_int(load_report.loaded_rows),
        format_int(load_report.skipped_rows)
    );
    if load_report.missing_ratings > 0 {
        println!(
            "Note: {} rows have no usable rating.",
            format_int(load_report.missing_ratings)
        );
    }
    println!();

    let (product, selection) = select_product(&data);
    let mut session = Session {
        data,
        product,
        selection,
        config: FilterConfig::default(),
        unfiltered: None,
    };

    loop {
        println!("[1] Show unfiltered charts");
        println!("[2] Adjust filters");
        println!("[3] Apply filters");
        println!("[4] Switch product");
        println!("[5] Exit\n");
        match read_line("Enter choice: ").as_str() {
            "1" => show_unfiltered(&mut session),
            "2" => adjust_filters(&mut session),
            "3" => apply_filters(&session),
            "4" => {
                let (product, selection) = select_product(&session.data);
                debug!(from = %session.product, to = %product, "switching product");
                session.product = product;
                session.selection = selection;
                // The cache is keyed by product; a switch invalidates it.
                session.unfiltered = None;
            }
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-5.\n"),
        }
    }
}
