//! Price series and the date-aligned price matrix.

use crate::domain::error::EvalError;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Adjusted closing prices for one symbol, in the order the source produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn from_pairs(symbol: impl Into<String>, pairs: &[(NaiveDate, f64)]) -> Self {
        Self::new(
            symbol,
            pairs
                .iter()
                .map(|&(date, price)| PricePoint { date, price })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Dates strictly ascending, prices finite and positive.
    pub fn validate(&self) -> Result<(), EvalError> {
        for point in &self.points {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(EvalError::InvalidPrice {
                    symbol: self.symbol.clone(),
                    date: point.date,
                    price: point.price,
                });
            }
        }
        for w in self.points.windows(2) {
            if w[1].date <= w[0].date {
                return Err(EvalError::UnorderedInput {
                    symbol: self.symbol.clone(),
                    date: w[1].date,
                });
            }
        }
        Ok(())
    }
}

/// Outer join of several [`PriceSeries`] on date.
///
/// Rows are the union of all dates, ascending. `cell(row, col)` is `None`
/// where a symbol has no price on that date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PriceMatrix {
    /// Join `series` in the given column order.
    ///
    /// Every series is validated first; an empty series fails with
    /// `MissingSymbolData` and a repeated symbol with `PriceData`.
    pub fn from_series(series: &[PriceSeries]) -> Result<Self, EvalError> {
        let mut seen = BTreeSet::new();
        for s in series {
            if !seen.insert(s.symbol.as_str()) {
                return Err(EvalError::PriceData {
                    reason: format!("symbol {} supplied more than once", s.symbol),
                });
            }
            if s.is_empty() {
                return Err(EvalError::MissingSymbolData {
                    symbol: s.symbol.clone(),
                });
            }
            s.validate()?;
        }

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_index: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();

        let mut cells = vec![vec![None; series.len()]; dates.len()];
        for (col, s) in series.iter().enumerate() {
            for p in &s.points {
                cells[row_index[&p.date]][col] = Some(p.price);
            }
        }

        Ok(Self {
            symbols: series.iter().map(|s| s.symbol.clone()).collect(),
            dates,
            cells,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// True when every column has a price in `row`.
    pub fn is_complete(&self, row: usize) -> bool {
        self.cells[row].iter().all(Option::is_some)
    }

    /// Keep only the listed columns, in the listed order.
    ///
    /// A symbol with no column, or a column with no prices, is `MissingSymbolData`.
    pub fn restrict(&self, symbols: &[String]) -> Result<Self, EvalError> {
        let mut cols = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let col = self
                .column(symbol)
                .ok_or_else(|| EvalError::MissingSymbolData {
                    symbol: symbol.clone(),
                })?;
            if self.cells.iter().all(|r| r[col].is_none()) {
                return Err(EvalError::MissingSymbolData {
                    symbol: symbol.clone(),
                });
            }
            cols.push(col);
        }

        let mut dates = Vec::new();
        let mut cells = Vec::new();
        for (row, date) in self.dates.iter().enumerate() {
            let projected: Vec<Option<f64>> = cols.iter().map(|&c| self.cells[row][c]).collect();
            // Rows where none of the kept symbols traded carry no information.
            if projected.iter().any(Option::is_some) {
                dates.push(*date);
                cells.push(projected);
            }
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            dates,
            cells,
        })
    }
}
