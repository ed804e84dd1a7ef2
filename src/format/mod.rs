//! Output formatters
//!
//! Provides trait-based output formatting for datasets and K-function
//! results.

pub mod json;
pub mod text;

use crate::error::Result;
use crate::pipeline::Dataset;
use crate::stats::KFunctionResult;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a generated dataset
    fn format_dataset(&self, dataset: &Dataset) -> Result<String>;

    /// Format a K-function analysis
    fn format_analysis(&self, result: &KFunctionResult) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    let formatters: [&dyn OutputFormatter; 2] = [&json::JsonFormatter, &text::TextFormatter];
    formatters
        .iter()
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
