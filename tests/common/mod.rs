#![allow(dead_code)]

use chrono::NaiveDate;
use portfolio_eval::domain::error::EvalError;
use portfolio_eval::domain::price::{PricePoint, PriceSeries};
use portfolio_eval::domain::weights::{NormalizedWeights, WeightPolicy, WeightVector};
use portfolio_eval::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EvalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(EvalError::PriceData {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(symbol)
            .map(|s| {
                s.points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(symbol, points))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn daily_series(symbol: &str, prices: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    PriceSeries::new(
        symbol,
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                price,
            })
            .collect(),
    )
}

pub fn normalized(pairs: &[(&str, f64)]) -> NormalizedWeights {
    WeightVector::from_pairs(pairs.iter().copied())
        .unwrap()
        .normalize(WeightPolicy::default())
        .unwrap()
}

pub fn raw(pairs: &[(&str, f64)]) -> WeightVector {
    WeightVector::from_pairs(pairs.iter().copied()).unwrap()
}
