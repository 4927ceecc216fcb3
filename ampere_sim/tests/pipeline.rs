use std::io::Write;

use ampere_sim::prelude::*;
use approx::assert_abs_diff_eq;
use tempfile::NamedTempFile;

/// Counts predict calls and otherwise holds its initial state.
#[derive(Default)]
struct CountingFilter {
    state: Option<FilterState>,
    predicts: usize,
}

impl Predict for CountingFilter {
    fn predict(&mut self, _delta_t: f64, _current: f64) -> Result<&FilterState, EstimationError> {
        self.predicts += 1;
        self.state.as_ref().ok_or(EstimationError::Uninitialized)
    }

    fn state(&self) -> Option<&FilterState> {
        self.state.as_ref()
    }

    fn reset_covariance(&mut self, _covariance: Covariance) -> Result<(), EstimationError> {
        Ok(())
    }
}

fn write_log(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const DISCHARGE_LOG: &str = "timestamp,voltage_load,current_load\n\
2025-01-09 11:51:34,4.10,0.0\n\
2025-01-09 11:51:35,4.02,2.5\n\
2025-01-09 11:51:36,4.00,2.5\n\
2025-01-09 11:51:37,3.99,2.5\n\
2025-01-09 11:51:38,3.98,2.5\n";

#[test]
fn test_malformed_row_means_no_predicts() {
    let log = write_log(
        "timestamp,voltage_load,current_load\n\
         2025-01-09 11:51:34,4.10,0.0\n\
         2025-01-09 11:51:35,,2.5\n\
         2025-01-09 11:51:36,4.00,2.5\n",
    );
    let mut filter = CountingFilter {
        state: Some(FilterState::default()),
        predicts: 0,
    };

    let err = run_with_filter(
        log.path(),
        &IngestOptions::default(),
        &mut filter,
        &SequenceOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RunError::Ingest(IngestError::MalformedRow {
            column: "voltage_load",
            ..
        })
    ));
    assert_eq!(filter.predicts, 0);
}

#[test]
fn test_well_formed_log_costs_one_predict_per_later_sample() {
    let log = write_log(DISCHARGE_LOG);
    let mut filter = CountingFilter {
        state: Some(FilterState::default()),
        predicts: 0,
    };

    let output = run_with_filter(
        log.path(),
        &IngestOptions::default(),
        &mut filter,
        &SequenceOptions::default(),
    )
    .unwrap();

    assert_eq!(output.samples.len(), 5);
    assert_eq!(output.estimates.len(), 5);
    assert_eq!(filter.predicts, 4);
}

#[test]
fn test_configured_run_discharges_the_cell() {
    let log = write_log(DISCHARGE_LOG);
    let config = AmpereConfig::default();
    let params = config.cell.parameters().unwrap();

    let output = run(&config, log.path()).unwrap();

    // Trailing alignment: the 0 A of the first row drives the first second.
    let expected_soc = 0.5 - 3.0 * 2.5 * 1.0 / params.capacity;
    let last = output.final_estimate().unwrap();
    assert_eq!(last.index, 4);
    assert_abs_diff_eq!(last.elapsed_seconds, 4.0);
    assert_abs_diff_eq!(last.x[0], expected_soc, epsilon = 1e-12);
    assert!(last.x[1] > 0.0 && last.x[2] > 0.0);

    for pair in output.estimates.windows(2) {
        assert!(pair[1].x[0] <= pair[0].x[0]);
        let p = pair[1].covariance;
        assert_eq!(p, p.transpose());
        assert!(p.diagonal().iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn test_trace_file_has_one_row_per_sample() {
    let log = write_log(DISCHARGE_LOG);
    let output = run(&AmpereConfig::default(), log.path()).unwrap();

    let trace = NamedTempFile::new().unwrap();
    write_trace_file(trace.path(), &output.samples, &output.estimates).unwrap();

    let mut reader = csv::Reader::from_path(trace.path()).unwrap();
    assert_eq!(reader.headers().unwrap().len(), 10);
    assert_eq!(reader.records().count(), 5);
}

#[test]
fn test_unknown_temperature_bucket_fails_before_ingest() {
    let mut config = AmpereConfig::default();
    config.cell.temperature = -20;

    let err = run(&config, std::path::Path::new("/nonexistent/log.csv")).unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::NoParameterSet { .. })
    ));
}

#[test]
fn test_shipped_config_and_sample_log() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let config = load_config(Some(root.join("assets/cells/default.toml").as_path())).unwrap();
    assert_eq!(config.cell.parameter_sets.len(), 3);
    assert_eq!(config.cell.parameters().unwrap().temperature, 25);

    let output = run(&config, &root.join("assets/data/sample_discharge.csv")).unwrap();
    assert_eq!(output.estimates.len(), 120);

    // 80 s at 2.5 A out of a 2500 C cell.
    let last = output.final_estimate().unwrap();
    assert_abs_diff_eq!(last.x[0], 0.5 - 80.0 * 2.5 / 2500.0, epsilon = 1e-9);
}
