//! Evaluation parameters and the end-to-end evaluation run.
//!
//! `EvalConfig` holds everything one run needs; [`run_evaluation`] fetches
//! prices through a [`PriceDataPort`], feeds the return engine and gathers the
//! statistics into an [`EvaluationReport`] for the renderers.

use chrono::NaiveDate;

use crate::domain::error::EvalError;
use crate::domain::returns::{self, PortfolioSeries};
use crate::domain::statistics::{Summary, TRADING_DAYS_PER_YEAR};
use crate::domain::weights::{NormalizedWeights, WeightPolicy, WeightVector};
use crate::ports::data_port::PriceDataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weight_policy: WeightPolicy,
    pub trading_days: f64,
}

impl EvalConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            weight_policy: WeightPolicy::default(),
            trading_days: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Everything a renderer needs from one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weights: NormalizedWeights,
    pub series: PortfolioSeries,
    pub summary: Summary,
}

pub fn run_evaluation(
    data_port: &dyn PriceDataPort,
    name: &str,
    raw_weights: &WeightVector,
    config: &EvalConfig,
) -> Result<EvaluationReport, EvalError> {
    let weights = raw_weights.normalize(config.weight_policy)?;
    tracing::info!(
        holdings = weights.len(),
        "normalized portfolio weights for {name}"
    );

    let mut price_series = Vec::with_capacity(weights.len());
    for holding in weights.holdings() {
        let series =
            data_port.fetch_prices(&holding.symbol, config.start_date, config.end_date)?;
        if series.is_empty() {
            return Err(EvalError::MissingSymbolData {
                symbol: holding.symbol.clone(),
            });
        }
        tracing::info!(
            symbol = %holding.symbol,
            weight = holding.weight,
            rows = series.len(),
            first = ?series.first_date(),
            last = ?series.last_date(),
            "loaded prices"
        );
        price_series.push(series);
    }

    let series = returns::evaluate(&price_series, &weights)?;
    let summary = Summary::compute(&series, config.trading_days);

    Ok(EvaluationReport {
        name: name.to_string(),
        start_date: config.start_date,
        end_date: config.end_date,
        weights,
        series,
        summary,
    })
}
