//! Return computation: prices -> periodic returns -> portfolio value curve.
//!
//! Alignment is conservative. Matrix rows where any held symbol lacks a price
//! are dropped, never filled. Each remaining row's return is measured against
//! the previous remaining row, so a move across a gap is kept in full.

use crate::domain::error::EvalError;
use crate::domain::price::{PriceMatrix, PriceSeries};
use crate::domain::weights::NormalizedWeights;
use chrono::NaiveDate;

const PORTFOLIO_LABEL: &str = "portfolio";

/// Fractional change from the previous observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Growth of one unit invested at the base date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-symbol returns restricted to the dates the portfolio uses.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetReturns {
    pub symbol: String,
    pub weight: f64,
    pub returns: Vec<ReturnPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSeries {
    /// First complete matrix date, where the curve is 1.0.
    pub base_date: Option<NaiveDate>,
    pub returns: Vec<ReturnPoint>,
    pub values: Vec<ValuePoint>,
    pub assets: Vec<AssetReturns>,
    /// Matrix dates where at least one held symbol had no price.
    pub dropped_dates: Vec<NaiveDate>,
}

impl PortfolioSeries {
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn return_values(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.value).collect()
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().map(|v| v.value).unwrap_or(1.0)
    }
}

/// `values` prefixed with the unit start they compound from. Empty stays empty.
pub fn anchored(values: &[ValuePoint]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    std::iter::once(1.0)
        .chain(values.iter().map(|v| v.value))
        .collect()
}

/// Simple returns of one series: `p[t] / p[t-1] - 1`, first date dropped.
pub fn asset_returns(series: &PriceSeries) -> Result<Vec<ReturnPoint>, EvalError> {
    series.validate()?;
    Ok(series
        .points
        .windows(2)
        .map(|w| ReturnPoint {
            date: w[1].date,
            value: w[1].price / w[0].price - 1.0,
        })
        .collect())
}

/// Compound `returns` left to right into a value curve starting from 1.0.
///
/// Fails with `UnorderedInput` unless dates are strictly ascending.
pub fn cumulative_value(returns: &[ReturnPoint]) -> Result<Vec<ValuePoint>, EvalError> {
    let mut values = Vec::with_capacity(returns.len());
    let mut value = 1.0_f64;
    let mut prev: Option<NaiveDate> = None;

    for r in returns {
        if prev.is_some_and(|p| r.date <= p) {
            return Err(EvalError::UnorderedInput {
                symbol: PORTFOLIO_LABEL.to_string(),
                date: r.date,
            });
        }
        value *= 1.0 + r.value;
        values.push(ValuePoint {
            date: r.date,
            value,
        });
        prev = Some(r.date);
    }

    Ok(values)
}

/// Weighted portfolio returns over an aligned price matrix.
///
/// The matrix is restricted to the weighted symbols first, so extra columns
/// are ignored and absent ones fail with `MissingSymbolData`.
pub fn portfolio_returns(
    matrix: &PriceMatrix,
    weights: &NormalizedWeights,
) -> Result<PortfolioSeries, EvalError> {
    let matrix = matrix.restrict(&weights.symbols())?;
    let holdings = weights.holdings();

    let dates = matrix.dates();
    let mut complete = Vec::with_capacity(matrix.row_count());
    let mut dropped_dates = Vec::new();
    for row in 0..matrix.row_count() {
        if matrix.is_complete(row) {
            complete.push(row);
        } else {
            tracing::debug!(date = %dates[row], "dropping date with incomplete prices");
            dropped_dates.push(dates[row]);
        }
    }

    let mut returns = Vec::new();
    let mut per_asset: Vec<Vec<ReturnPoint>> = vec![Vec::new(); holdings.len()];

    for pair in complete.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let asset_values: Vec<f64> = (0..holdings.len())
            .filter_map(|col| Some(matrix.cell(curr, col)? / matrix.cell(prev, col)? - 1.0))
            .collect();

        let portfolio_return = holdings
            .iter()
            .zip(&asset_values)
            .fold(0.0_f64, |acc, (h, r)| acc + h.weight * r);

        returns.push(ReturnPoint {
            date: dates[curr],
            value: portfolio_return,
        });
        for (series, &value) in per_asset.iter_mut().zip(&asset_values) {
            series.push(ReturnPoint {
                date: dates[curr],
                value,
            });
        }
    }

    // The base is the first complete row, once at least one return follows it.
    let base_date = if complete.len() > 1 {
        complete.first().map(|&row| dates[row])
    } else {
        None
    };

    let values = cumulative_value(&returns)?;

    Ok(PortfolioSeries {
        base_date,
        returns,
        values,
        assets: holdings
            .iter()
            .zip(per_asset)
            .map(|(h, returns)| AssetReturns {
                symbol: h.symbol.clone(),
                weight: h.weight,
                returns,
            })
            .collect(),
        dropped_dates,
    })
}

/// Full pipeline from raw per-symbol series.
///
/// Every weighted symbol must have a non-empty series; series for symbols
/// that carry no weight are ignored.
pub fn evaluate(
    series: &[PriceSeries],
    weights: &NormalizedWeights,
) -> Result<PortfolioSeries, EvalError> {
    let mut selected = Vec::with_capacity(weights.len());
    for symbol in weights.symbols() {
        let s = series
            .iter()
            .find(|s| s.symbol == symbol)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EvalError::MissingSymbolData {
                symbol: symbol.clone(),
            })?;
        selected.push(s.clone());
    }

    let matrix = PriceMatrix::from_series(&selected)?;
    let result = portfolio_returns(&matrix, weights)?;

    if !result.dropped_dates.is_empty() {
        tracing::warn!(
            dropped = result.dropped_dates.len(),
            "excluded dates where not every symbol had consecutive prices"
        );
    }

    Ok(result)
}
