//! CSV portfolio definition adapter.
//!
//! Expects a header row with `symbol` and `weight` columns (any order, any
//! case). Other columns are ignored. Symbols are trimmed and upper-cased.

use crate::domain::error::EvalError;
use crate::domain::weights::WeightVector;
use crate::ports::portfolio_port::PortfolioPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvPortfolioAdapter {
    path: PathBuf,
}

impl CsvPortfolioAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Portfolio name used in report file names: the file stem.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "portfolio".to_string())
    }

    pub fn parse(content: &str, file: &Path) -> Result<WeightVector, EvalError> {
        let parse_err = |reason: String| EvalError::PortfolioParse {
            file: file.display().to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| parse_err(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let symbol_col = headers
            .iter()
            .position(|h| h == "symbol")
            .ok_or_else(|| parse_err("missing symbol column".into()))?;
        let weight_col = headers
            .iter()
            .position(|h| h == "weight")
            .ok_or_else(|| parse_err("missing weight column".into()))?;

        let mut weights = WeightVector::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| parse_err(e.to_string()))?;
            // Header is line 1.
            let line = line + 2;

            let symbol = record.get(symbol_col).unwrap_or_default().trim().to_uppercase();
            if symbol.is_empty() {
                return Err(parse_err(format!("empty symbol on line {line}")));
            }

            let raw = record.get(weight_col).unwrap_or_default().trim();
            let weight: f64 = raw.parse().map_err(|e| {
                parse_err(format!("invalid weight {raw:?} for {symbol} on line {line}: {e}"))
            })?;

            weights.push(symbol, weight)?;
        }

        Ok(weights)
    }
}

impl PortfolioPort for CsvPortfolioAdapter {
    fn load_weights(&self) -> Result<WeightVector, EvalError> {
        tracing::info!(path = %self.path.display(), "loading portfolio");
        let content = fs::read_to_string(&self.path).map_err(|e| EvalError::PortfolioParse {
            file: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, &self.path)
    }
}
