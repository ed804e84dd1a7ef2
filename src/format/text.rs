//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pipeline::Dataset;
use crate::stats::KFunctionResult;

/// Radii shown in the analysis table
const TABLE_ROWS: usize = 10;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable summary"
    }

    fn format_dataset(&self, dataset: &Dataset) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str("spatial-synth dataset\n");
        output.push_str(&format!("Units: {}\n", dataset.units.len()));
        output.push_str(&format!("Points: {}\n", dataset.points.len()));
        output.push_str(&format!(
            "Total sales potential: {:.2}\n",
            dataset.total_sales_potential()
        ));
        output.push_str(&format!("Total workload: {:.2}\n\n", dataset.total_workload()));

        // Per-unit breakdown
        output.push_str("Units:\n");
        output.push_str(&format!(
            "  {:>4}  {:>12}  {:>6}  {:>14}  {:>9}\n",
            "id", "area", "points", "sales", "workload"
        ));
        for summary in dataset.unit_summaries() {
            output.push_str(&format!(
                "  {:>4}  {:>12.2}  {:>6}  {:>14.2}  {:>9.2}\n",
                summary.unit_id,
                summary.area,
                summary.point_count,
                summary.sales_potential,
                summary.workload
            ));
        }

        Ok(output)
    }

    fn format_analysis(&self, result: &KFunctionResult) -> Result<String> {
        let mut output = String::new();

        output.push_str("Ripley's K-function\n");
        output.push_str(&format!("Pattern: {}\n", result.pattern));
        output.push_str(&format!("Hull area: {:.4}\n", result.hull_area));
        output.push_str(&format!("Simulations: {}\n\n", result.simulations));

        output.push_str(&format!(
            "  {:>10}  {:>12}  {:>12}  {:>12}  {:>12}\n",
            "r", "observed", "expected", "lower", "upper"
        ));

        let stride = result.radii.len().div_ceil(TABLE_ROWS).max(1);
        for i in (0..result.radii.len()).step_by(stride) {
            let (lower, upper) = match result.envelope.get(i) {
                Some((l, u)) => (format!("{:.4}", l), format!("{:.4}", u)),
                None => ("-".to_string(), "-".to_string()),
            };
            output.push_str(&format!(
                "  {:>10.4}  {:>12.4}  {:>12.4}  {:>12}  {:>12}\n",
                result.radii[i], result.observed[i], result.expected[i], lower, upper
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataGeneratorConfig, DistributionConfig, VoronoiConfig};
    use crate::geometry::BoundingBox;
    use crate::pipeline::generate_data;
    use crate::stats::PointPattern;

    fn create_test_dataset() -> Dataset {
        let config = DataGeneratorConfig::new(
            VoronoiConfig::new(3, BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()),
            12345,
        )
        .with_distribution(DistributionConfig::HomogeneousPoisson { intensity: 0.5 });
        generate_data(&config).unwrap()
    }

    #[test]
    fn test_text_dataset_format() {
        let dataset = create_test_dataset();
        let output = TextFormatter.format_dataset(&dataset).unwrap();

        assert!(output.contains("spatial-synth dataset"));
        assert!(output.contains(&format!("Units: {}", dataset.units.len())));
        assert!(output.contains(&format!("Points: {}", dataset.points.len())));
        assert!(output.contains("Total sales potential:"));
        // Header line plus one line per unit
        let rows = output.lines().skip_while(|l| *l != "Units:").count();
        assert_eq!(rows, dataset.units.len() + 2);
    }

    #[test]
    fn test_text_analysis_format_without_envelope() {
        let result = KFunctionResult {
            radii: vec![0.0, 1.0, 2.0],
            observed: vec![0.0, 2.0, 9.0],
            expected: vec![0.0, 3.1416, 12.5664],
            envelope: vec![],
            pattern: PointPattern::Unknown,
            hull_area: 16.0,
            simulations: 0,
        };
        let output = TextFormatter.format_analysis(&result).unwrap();

        assert!(output.contains("Pattern: Unknown (simulations not available)"));
        assert!(output.contains("Simulations: 0"));
        assert_eq!(output.lines().filter(|l| l.trim_end().ends_with('-')).count(), 3);
    }

    #[test]
    fn test_text_analysis_table_is_thinned() {
        let n = 100;
        let result = KFunctionResult {
            radii: (0..n).map(|i| i as f64).collect(),
            observed: vec![1.0; n],
            expected: vec![1.0; n],
            envelope: vec![(0.5, 1.5); n],
            pattern: PointPattern::Random,
            hull_area: 100.0,
            simulations: 99,
        };
        let output = TextFormatter.format_analysis(&result).unwrap();

        assert!(output.contains("Pattern: Random"));
        let rows = output.lines().filter(|l| l.contains("1.5000")).count();
        assert_eq!(rows, TABLE_ROWS);
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
