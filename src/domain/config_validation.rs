//! Configuration validation.
//!
//! Validates all config fields before an evaluation runs. Command-line flags
//! are merged into the configuration first, so these checks see the final
//! values regardless of where they came from.

use crate::domain::error::EvalError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const MIN_CHART_WIDTH: i64 = 200;
pub const MIN_CHART_HEIGHT: i64 = 150;

pub fn validate_eval_config(config: &dyn ConfigPort) -> Result<(), EvalError> {
    validate_portfolio(config)?;
    validate_data_source(config)?;
    validate_dates(config)?;
    validate_trading_days(config)?;
    validate_chart_size(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EvalError {
    EvalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_portfolio(config: &dyn ConfigPort) -> Result<(), EvalError> {
    match config.get_string("portfolio", "file") {
        Some(_) => Ok(()),
        None => Err(EvalError::ConfigMissing {
            section: "portfolio".to_string(),
            key: "file".to_string(),
        }),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), EvalError> {
    let file = config.get_string("data", "file");
    let dir = config.get_string("data", "dir");
    match (file, dir) {
        (Some(_), Some(_)) => Err(invalid(
            "data",
            "file",
            "set either data.file or data.dir, not both",
        )),
        (None, None) => Err(EvalError::ConfigMissing {
            section: "data".to_string(),
            key: "file".to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn parse_date(value: Option<&str>, key: &str) -> Result<NaiveDate, EvalError> {
    match value {
        None => Err(EvalError::ConfigMissing {
            section: "evaluation".to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "evaluation",
                key,
                format!("invalid {key} format, expected YYYY-MM-DD"),
            )
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), EvalError> {
    let start_date = parse_date(
        config.get_string("evaluation", "start_date").as_deref(),
        "start_date",
    )?;

    if let Some(end_str) = config.get_string("evaluation", "end_date") {
        let end_date = parse_date(Some(&end_str), "end_date")?;
        if start_date >= end_date {
            return Err(invalid(
                "evaluation",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), EvalError> {
    if config.get_string("statistics", "trading_days").is_none() {
        return Ok(());
    }
    let value = config.get_double("statistics", "trading_days", f64::NAN);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "statistics",
            "trading_days",
            "trading_days must be a positive number",
        ));
    }
    Ok(())
}

fn validate_chart_size(config: &dyn ConfigPort) -> Result<(), EvalError> {
    let width = config.get_int("report", "width", 1000);
    if width < MIN_CHART_WIDTH {
        return Err(invalid(
            "report",
            "width",
            format!("width must be at least {MIN_CHART_WIDTH}"),
        ));
    }
    let height = config.get_int("report", "height", 600);
    if height < MIN_CHART_HEIGHT {
        return Err(invalid(
            "report",
            "height",
            format!("height must be at least {MIN_CHART_HEIGHT}"),
        ));
    }
    Ok(())
}
