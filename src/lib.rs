// Library exports for panelgraph

pub mod components;
pub mod data;
pub mod enumerate;
pub mod format;
pub mod parser;
pub mod resolve;
pub mod runtime;
pub mod settings;

// Pipeline stages
pub mod ir;
pub mod transform;
pub mod compiler;

pub use compiler::compose;
pub use data::DataTable;
pub use ir::{ChartSpec, ValueRecord};
pub use runtime::build_chart;
pub use settings::VisualSettings;
pub use transform::map_table;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("Input contract violation: {0}")]
    InputContractViolation(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
