//! Integration tests for the date filter stage: the reference collection-round
//! scenario, config-driven startup, and the stage-level properties
//! (independence, idempotence, parallel/sequential agreement).

use std::collections::HashSet;

use enpa_core::config::Config;
use enpa_core::{DataShare, DataShareMetadata, EnpaError};
use enpa_pipeline::{classify, DateFilter, FilterRunner, TimeWindow};

// ============================================================================
// Test Helpers
// ============================================================================

fn meta() -> DataShareMetadata {
    DataShareMetadata::new("sampleMetric")
}

fn share(path: &str, created_ms: i64) -> DataShare {
    DataShare::new(path, meta()).with_created_ms(created_ms)
}

/// The batch from the reference scenario: one share before, one at the lower
/// bound, one at the upper bound, one without a creation time.
fn reference_batch() -> Vec<DataShare> {
    vec![
        share("id1", 1000),
        share("id2", 2000),
        share("id3", 3000),
        DataShare::new("missing", meta()),
    ]
}

/// A spread of timestamps around a window of `[2000, 3000)`.
fn spread_batch() -> Vec<DataShare> {
    let mut shares: Vec<DataShare> = (0..500i64)
        .map(|i| share(&format!("s{i}"), i * 10))
        .collect();
    shares.extend((0..20).map(|i| DataShare::new(format!("n{i}"), meta())));
    shares
}

fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

fn paths(shares: &[DataShare]) -> HashSet<String> {
    shares.iter().map(|s| s.path.clone()).collect()
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_reference_scenario() {
    let filter = DateFilter::new(TimeWindow::new(2, 1).unwrap());
    let output = filter.filter_par(reference_batch());

    assert_eq!(output, vec![share("id2", 2000)]);

    let stats = filter.stats();
    assert_eq!(stats.included, 1);
    assert_eq!(stats.excluded, 3);
    assert_eq!(stats.before_window, 1);
    assert_eq!(stats.after_window, 1);
    assert_eq!(stats.missing_timestamp, 1);
}

#[test]
fn test_reference_scenario_from_env_style_config() {
    let pairs = [
        ("PIPELINE_START_TIME", "2"),
        ("PIPELINE_DURATION", "1"),
        ("PIPELINE_WORKERS", "2"),
    ];
    let config = Config::from_lookup("", lookup(&pairs)).unwrap();
    let runner = FilterRunner::from_config(&config).unwrap();

    let output = runner.run(reference_batch());
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].path, "id2");
    assert_eq!(output[0].created_ms, Some(2000));
    assert_eq!(output[0].metadata, meta());
}

// ============================================================================
// Startup validation
// ============================================================================

#[test]
fn test_missing_options_fail_at_startup() {
    let config = Config::from_lookup("", lookup(&[("PIPELINE_DURATION", "1")])).unwrap();
    assert_eq!(
        FilterRunner::from_config(&config).err(),
        Some(EnpaError::MissingOption("start_time"))
    );

    let config = Config::from_lookup("", lookup(&[("PIPELINE_START_TIME", "2")])).unwrap();
    assert_eq!(
        DateFilter::from_config(&config).err(),
        Some(EnpaError::MissingOption("duration"))
    );
}

#[test]
fn test_negative_duration_fails_at_startup() {
    let pairs = [("PIPELINE_START_TIME", "2"), ("PIPELINE_DURATION", "-3600")];
    let config = Config::from_lookup("", lookup(&pairs)).unwrap();
    assert_eq!(
        DateFilter::from_config(&config).err(),
        Some(EnpaError::NegativeDuration(-3600))
    );
}

#[test]
fn test_garbage_option_fails_at_startup() {
    let pairs = [("PIPELINE_START_TIME", "yesterday"), ("PIPELINE_DURATION", "1")];
    let err = Config::from_lookup("", lookup(&pairs)).unwrap_err();
    assert!(matches!(err, EnpaError::InvalidOption { .. }));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_missing_timestamp_always_rejected() {
    let missing = DataShare::new("missing", meta());
    for (s, d) in [(0, 0), (0, 1), (-5, 10), (1_600_000_000, 86_400)] {
        let window = TimeWindow::new(s, d).unwrap();
        assert!(!classify(&missing, &window), "s={s} d={d}");
    }
}

#[test]
fn test_zero_width_window_rejects_everything() {
    let filter = DateFilter::new(TimeWindow::new(2, 0).unwrap());
    assert!(filter.filter_par(spread_batch()).is_empty());
    assert_eq!(filter.stats().included, 0);
}

#[test]
fn test_verdict_independent_of_batch() {
    let window = TimeWindow::new(2, 1).unwrap();
    let batch = spread_batch();

    let together = DateFilter::new(window).filter_par(batch.clone());

    let alone: Vec<DataShare> = batch
        .iter()
        .filter(|s| {
            DateFilter::new(window)
                .process((*s).clone())
                .is_some()
        })
        .cloned()
        .collect();

    let mut reversed = batch.clone();
    reversed.reverse();
    let reversed_out = DateFilter::new(window).filter_par(reversed);

    assert_eq!(together, alone);
    assert_eq!(paths(&together), paths(&reversed_out));
    assert_eq!(together.len(), 100);
}

#[test]
fn test_refilter_is_idempotent() {
    let filter = DateFilter::new(TimeWindow::new(2, 1).unwrap());
    let once = filter.filter_par(spread_batch());
    let twice = filter.filter_par(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_parallel_matches_sequential() {
    let window = TimeWindow::new(1, 2).unwrap();
    let sequential: Vec<_> = DateFilter::new(window)
        .filter_iter(spread_batch())
        .collect();
    let runner = FilterRunner::new(DateFilter::new(window), 4).unwrap();
    let parallel = runner.run(spread_batch());
    assert_eq!(sequential, parallel);
}
