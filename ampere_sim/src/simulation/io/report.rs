// ampere_sim/src/simulation/io/report.rs

use std::io::Write;
use std::path::Path;

use ampere_core::messages::{Estimate, MeasurementSample};
use ampere_core::types::StateVariable;

/// Column names of the per-sample trace.
pub const TRACE_HEADER: [&str; 10] = [
    "index",
    "elapsed_s",
    "voltage_load",
    "current_load",
    "soc",
    "v1",
    "v2",
    "var_soc",
    "var_v1",
    "var_v2",
];

/// Writes one trace row per estimate. `samples` supplies the measured
/// voltage/current that produced each estimate.
pub fn write_trace<W: Write>(
    writer: W,
    samples: &[MeasurementSample],
    estimates: &[Estimate],
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TRACE_HEADER)?;

    for estimate in estimates {
        let (voltage, current) = samples
            .get(estimate.index)
            .map_or((f64::NAN, f64::NAN), |s| (s.voltage, s.current));
        let variances = estimate.variances();

        wtr.write_record(&[
            estimate.index.to_string(),
            format!("{:.3}", estimate.elapsed_seconds),
            format!("{:.6}", voltage),
            format!("{:.6}", current),
            format!("{:.9}", estimate.x[StateVariable::StateOfCharge.index()]),
            format!("{:.9}", estimate.x[StateVariable::Branch1Voltage.index()]),
            format!("{:.9}", estimate.x[StateVariable::Branch2Voltage.index()]),
            format!("{:.6e}", variances[0]),
            format!("{:.6e}", variances[1]),
            format!("{:.6e}", variances[2]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_trace_file(
    path: &Path,
    samples: &[MeasurementSample],
    estimates: &[Estimate],
) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_trace(file, samples, estimates)
}

/// Human-readable rendering of the final estimate, as printed by the driver.
pub fn format_summary(estimate: &Estimate) -> String {
    let variances = estimate.variances();
    format!(
        "sample {} (t = {:.1} s)\n  x      = [{:.6}, {:.6e}, {:.6e}]\n  diag P = [{:.6e}, {:.6e}, {:.6e}]",
        estimate.index,
        estimate.elapsed_seconds,
        estimate.x[0],
        estimate.x[1],
        estimate.x[2],
        variances[0],
        variances[1],
        variances[2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampere_core::time::parse_timestamp;
    use ampere_core::types::{Covariance, StateVector};

    fn estimate(index: usize) -> Estimate {
        Estimate {
            index,
            elapsed_seconds: index as f64,
            x: StateVector::new(0.5, 1e-4, -2e-5),
            covariance: Covariance::from_diagonal_element(0.25),
        }
    }

    #[test]
    fn test_trace_has_header_and_one_row_per_estimate() {
        let samples = vec![
            MeasurementSample {
                timestamp: parse_timestamp("2025-01-09 11:51:34").unwrap(),
                voltage: 3.9,
                current: 1.5,
            };
            2
        ];
        let mut out = Vec::new();
        write_trace(&mut out, &samples, &[estimate(0), estimate(1)]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TRACE_HEADER.join(","));
        assert!(lines[1].starts_with("0,0.000,3.900000,1.500000,0.500000000,"));
    }

    #[test]
    fn test_summary_mentions_state_and_variances() {
        let summary = format_summary(&estimate(7));
        assert!(summary.contains("sample 7"));
        assert!(summary.contains("0.500000"));
        assert!(summary.contains("2.500000e-1"));
    }
}
