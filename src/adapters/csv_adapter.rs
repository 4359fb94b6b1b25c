//! CSV price data adapters.
//!
//! Two layouts are supported:
//! - [`CsvDirectoryAdapter`]: one `<SYMBOL>.csv` per symbol with a `date`
//!   column and an `adj_close` (or `close`) column.
//! - [`WideCsvAdapter`]: a single table whose first column is the date and
//!   whose remaining columns are symbols. Empty cells are missing prices.
//!
//! Rows keep file order; ordering is checked by the domain, not fixed here.

use crate::domain::error::EvalError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const PRICE_COLUMNS: [&str; 3] = ["adj_close", "adjclose", "close"];

/// Lower-cased header with spaces folded to underscores ("Adj Close" -> "adj_close").
fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// `YYYY-MM-DD`, optionally followed by a time part which is ignored.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, EvalError> {
    let trimmed = value.trim();
    let day = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| EvalError::PriceData {
        reason: format!("invalid date {trimmed:?}: {e}"),
    })
}

fn parse_price(value: &str, symbol: &str, date: NaiveDate) -> Result<f64, EvalError> {
    value.trim().parse().map_err(|e| EvalError::PriceData {
        reason: format!("invalid price {value:?} for {symbol} on {date}: {e}"),
    })
}

fn in_window(date: NaiveDate, start_date: NaiveDate, end_date: NaiveDate) -> bool {
    date >= start_date && date <= end_date
}

pub struct CsvDirectoryAdapter {
    base_path: PathBuf,
}

impl CsvDirectoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

impl PriceDataPort for CsvDirectoryAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EvalError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "no price file for {symbol}");
            return Err(EvalError::MissingSymbolData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| EvalError::PriceData {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| EvalError::PriceData {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?
            .iter()
            .map(normalize_header)
            .collect();

        let date_col = headers
            .iter()
            .position(|h| h == "date")
            .ok_or_else(|| EvalError::PriceData {
                reason: format!("missing date column in {}", path.display()),
            })?;
        let price_col = PRICE_COLUMNS
            .iter()
            .find_map(|name| headers.iter().position(|h| h == name))
            .ok_or_else(|| EvalError::PriceData {
                reason: format!("missing adj_close/close column in {}", path.display()),
            })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| EvalError::PriceData {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = parse_date(record.get(date_col).unwrap_or_default())?;
            if !in_window(date, start_date, end_date) {
                continue;
            }

            let raw = record.get(price_col).unwrap_or_default();
            if raw.trim().is_empty() {
                continue;
            }
            points.push(PricePoint {
                date,
                price: parse_price(raw, symbol, date)?,
            });
        }

        Ok(PriceSeries::new(symbol, points))
    }
}

/// Whole-table adapter; the file is parsed once at construction.
pub struct WideCsvAdapter {
    columns: HashMap<String, Vec<PricePoint>>,
}

impl WideCsvAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EvalError::PriceData {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_string(&content)
    }

    pub fn from_string(content: &str) -> Result<Self, EvalError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let symbols: Vec<String> = rdr
            .headers()
            .map_err(|e| EvalError::PriceData {
                reason: format!("CSV parse error: {}", e),
            })?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_uppercase())
            .collect();

        if symbols.is_empty() {
            return Err(EvalError::PriceData {
                reason: "price table has no symbol columns".into(),
            });
        }

        let mut columns: HashMap<String, Vec<PricePoint>> = symbols
            .iter()
            .map(|s| (s.clone(), Vec::new()))
            .collect();

        for result in rdr.records() {
            let record = result.map_err(|e| EvalError::PriceData {
                reason: format!("CSV parse error: {}", e),
            })?;
            let date = parse_date(record.get(0).unwrap_or_default())?;

            for (i, symbol) in symbols.iter().enumerate() {
                let raw = record.get(i + 1).unwrap_or_default();
                if raw.trim().is_empty() {
                    continue;
                }
                let price = parse_price(raw, symbol, date)?;
                if let Some(points) = columns.get_mut(symbol) {
                    points.push(PricePoint { date, price });
                }
            }
        }

        Ok(Self { columns })
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.columns.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl PriceDataPort for WideCsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EvalError> {
        let points = self
            .columns
            .get(symbol)
            .ok_or_else(|| EvalError::MissingSymbolData {
                symbol: symbol.to_string(),
            })?;

        Ok(PriceSeries::new(
            symbol,
            points
                .iter()
                .filter(|p| in_window(p.date, start_date, end_date))
                .copied()
                .collect(),
        ))
    }
}
