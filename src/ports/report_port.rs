//! Report output port.

use crate::domain::error::EvalError;
use crate::domain::evaluation::EvaluationReport;
use std::path::Path;

/// Port for writing evaluation reports.
pub trait ReportPort {
    fn write(&self, report: &EvaluationReport, output_path: &Path) -> Result<(), EvalError>;
}
