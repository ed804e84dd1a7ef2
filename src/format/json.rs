//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pipeline::Dataset;
use crate::stats::KFunctionResult;

/// JSON formatter - outputs full results as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON output"
    }

    fn format_dataset(&self, dataset: &Dataset) -> Result<String> {
        Ok(serde_json::to_string_pretty(dataset)?)
    }

    fn format_analysis(&self, result: &KFunctionResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}
